//! Immutable sky-map data grids.
//!
//! A [`SkyGrid`] holds a ring × latitude × longitude table of raw survey
//! values together with the per-axis affine transforms that map sky
//! coordinates to pixel indices. Grids are loaded once, up front, from an
//! external reader (header parsing and file I/O are not this crate's
//! business) and are read-only afterwards; a malformed grid is rejected at
//! construction, never mid-integration.

use log::info;
use ndarray::Array3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Direction;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid axis {0} has zero size")]
    EmptyAxis(&'static str),

    #[error("grid data has {found} values, expected {expected} (rings × lat × lon)")]
    ShapeMismatch { expected: usize, found: usize },
}

/// Affine map between a world coordinate and a pixel index along one axis,
/// in the reference-pixel / reference-value / increment convention of
/// astronomical image headers.
///
/// `ref_pixel` is the 1-based reference pixel as found in headers; the
/// methods below speak 0-based pixel coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AxisTransform {
    pub ref_pixel: f64,
    pub ref_value: f64,
    pub delta: f64,
}

impl AxisTransform {
    pub fn new(ref_pixel: f64, ref_value: f64, delta: f64) -> Self {
        AxisTransform {
            ref_pixel,
            ref_value,
            delta,
        }
    }

    /// Fractional 0-based pixel coordinate of a world value.
    pub fn pixel(&self, value: f64) -> f64 {
        (value - self.ref_value) / self.delta + (self.ref_pixel - 1.0)
    }

    /// World value at a 0-based pixel coordinate; inverse of
    /// [`AxisTransform::pixel`].
    pub fn value(&self, pixel: f64) -> f64 {
        (pixel - (self.ref_pixel - 1.0)) * self.delta + self.ref_value
    }
}

/// Immutable ring × latitude × longitude data table with its coordinate
/// transforms. Axis values are galactic longitude/latitude in degrees.
#[derive(Debug, Clone)]
pub struct SkyGrid {
    lon_axis: AxisTransform,
    lat_axis: AxisTransform,
    data: Array3<f32>,
}

impl SkyGrid {
    /// Build a grid from already-loaded header values and a flattened data
    /// vector ordered ring-major, then latitude, then longitude.
    pub fn new(
        n_rings: usize,
        n_lat: usize,
        n_lon: usize,
        lon_axis: AxisTransform,
        lat_axis: AxisTransform,
        data: Vec<f32>,
    ) -> Result<Self, GridError> {
        if n_rings == 0 {
            return Err(GridError::EmptyAxis("ring"));
        }
        if n_lat == 0 {
            return Err(GridError::EmptyAxis("latitude"));
        }
        if n_lon == 0 {
            return Err(GridError::EmptyAxis("longitude"));
        }
        let expected = n_rings * n_lat * n_lon;
        if data.len() != expected {
            return Err(GridError::ShapeMismatch {
                expected,
                found: data.len(),
            });
        }
        let data = Array3::from_shape_vec((n_rings, n_lat, n_lon), data)
            .expect("shape already validated");
        info!(
            "sky grid loaded: {} rings, {} × {} pixels",
            n_rings, n_lat, n_lon
        );
        Ok(SkyGrid {
            lon_axis,
            lat_axis,
            data,
        })
    }

    pub fn rings(&self) -> usize {
        self.data.dim().0
    }

    pub fn lat_pixels(&self) -> usize {
        self.data.dim().1
    }

    pub fn lon_pixels(&self) -> usize {
        self.data.dim().2
    }

    pub fn lon_axis(&self) -> &AxisTransform {
        &self.lon_axis
    }

    pub fn lat_axis(&self) -> &AxisTransform {
        &self.lat_axis
    }

    /// Raw table value for a ring along a sky direction, nearest-pixel
    /// sampled.
    ///
    /// Latitude pixels beyond the map edge read as 0 (there is no data past
    /// the poles); longitude wraps around the full circle. A ring index
    /// outside the table is a programming error: callers are expected to go
    /// through the ring model, which owns the sentinel rule.
    pub fn value(&self, ring: usize, direction: &Direction) -> f64 {
        assert!(
            ring < self.rings(),
            "ring index {} outside grid with {} rings",
            ring,
            self.rings()
        );
        let lat_pixel = self.lat_axis.pixel(direction.lat_degrees()).round() as isize;
        if lat_pixel < 0 || lat_pixel >= self.lat_pixels() as isize {
            return 0.0;
        }
        let lon_pixel = (self.lon_axis.pixel(direction.lon_degrees()).round() as isize)
            .rem_euclid(self.lon_pixels() as isize);
        self.data[[ring, lat_pixel as usize, lon_pixel as usize]] as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// 2 rings over a 4 × 8 map covering the full sky at 45° resolution,
    /// centred like the survey maps: longitude 0° on pixel 4, latitude 0°
    /// between the middle rows.
    fn test_grid() -> SkyGrid {
        let lon_axis = AxisTransform::new(5.0, 0.0, -45.0);
        let lat_axis = AxisTransform::new(3.0, 0.0, 45.0);
        let data: Vec<f32> = (0..(2 * 4 * 8)).map(|v| v as f32).collect();
        SkyGrid::new(2, 4, 8, lon_axis, lat_axis, data).unwrap()
    }

    #[test]
    fn test_shape_mismatch_fails_fast() {
        let axis = AxisTransform::new(1.0, 0.0, 1.0);
        let result = SkyGrid::new(2, 4, 8, axis, axis, vec![0.0; 63]);
        assert!(matches!(
            result,
            Err(GridError::ShapeMismatch {
                expected: 64,
                found: 63
            })
        ));
    }

    #[test]
    fn test_empty_axis_fails_fast() {
        let axis = AxisTransform::new(1.0, 0.0, 1.0);
        assert!(matches!(
            SkyGrid::new(0, 4, 8, axis, axis, vec![]),
            Err(GridError::EmptyAxis("ring"))
        ));
    }

    #[test]
    fn test_axis_transform_round_trip() {
        let axis = AxisTransform::new(180.5, -179.875, 0.25);
        for value in [-179.875, -90.0, 0.0, 45.125, 179.875] {
            assert_relative_eq!(axis.value(axis.pixel(value)), value, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_round_trip_recovers_direction_within_half_pixel() {
        let grid = test_grid();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let lon: f64 = rng.gen_range(-180.0..180.0);
            let lat: f64 = rng.gen_range(-89.0..89.0);
            let lon_pixel = grid.lon_axis().pixel(lon).round();
            let lat_pixel = grid.lat_axis().pixel(lat).round();
            let lon_back = grid.lon_axis().value(lon_pixel);
            let lat_back = grid.lat_axis().value(lat_pixel);
            assert!((lon_back - lon).abs() <= 45.0 / 2.0 + 1e-9);
            assert!((lat_back - lat).abs() <= 45.0 / 2.0 + 1e-9);
        }
    }

    #[test]
    fn test_value_lookup_hits_expected_pixel() {
        let grid = test_grid();
        // lon 0° → pixel 4, lat 0° → pixel 2; ring 1 starts at offset 32.
        let v = grid.value(1, &Direction::from_degrees(0.0, 0.0));
        assert_relative_eq!(v, (32 + 2 * 8 + 4) as f64);
    }

    #[test]
    fn test_latitude_outside_map_reads_zero() {
        let grid = test_grid();
        // lat 90° → pixel 4, past the 4-row map.
        assert_eq!(grid.value(0, &Direction::from_degrees(0.0, 90.0)), 0.0);
    }

    #[test]
    fn test_longitude_wraps() {
        let grid = test_grid();
        let a = grid.value(0, &Direction::from_degrees(-180.0, 0.0));
        let b = grid.value(0, &Direction::from_degrees(180.0, 0.0));
        assert_relative_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "outside grid")]
    fn test_ring_index_out_of_table_panics() {
        let grid = test_grid();
        let _ = grid.value(2, &Direction::from_degrees(0.0, 0.0));
    }
}
