//! Sky-map pixel containers.
//!
//! An equirectangular longitude × latitude pixelisation: `resolution` rows
//! of latitude, twice that in longitude, every pixel sampled at its centre.
//! Maps are allocated up front, filled pixel by pixel, and treated as
//! immutable once filled. Per-pixel work only reads already-loaded immutable
//! model state, so the parallel fill needs no locking.

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::geometry::Direction;
use crate::units::Quantity;

/// Resolution and frequency metadata, the part an external writer
/// serialises alongside the pixel values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SkyMapMeta {
    /// Latitude rows; longitude has twice as many columns.
    pub resolution: usize,
    /// Observing frequency in Hz, if the product is frequency-resolved.
    pub frequency_hz: Option<f64>,
}

pub struct SkyMap {
    resolution: usize,
    frequency: Option<Quantity>,
    values: Vec<Quantity>,
}

fn direction_at(resolution: usize, index: usize) -> Direction {
    let columns = 2 * resolution;
    let row = index / columns;
    let column = index % columns;
    let lat = 90.0 - (row as f64 + 0.5) * 180.0 / resolution as f64;
    let lon = (column as f64 + 0.5) * 360.0 / columns as f64;
    Direction::from_degrees(lon, lat)
}

impl SkyMap {
    #[track_caller]
    pub fn new(resolution: usize, frequency: Option<Quantity>) -> Self {
        if resolution == 0 {
            panic!("sky map needs a positive resolution");
        }
        SkyMap {
            resolution,
            frequency,
            values: vec![Quantity::number(0.0); 2 * resolution * resolution],
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn frequency(&self) -> Option<Quantity> {
        self.frequency
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn meta(&self) -> SkyMapMeta {
        SkyMapMeta {
            resolution: self.resolution,
            frequency_hz: self.frequency.map(|f| f.value()),
        }
    }

    /// Sky direction at the centre of a pixel.
    #[track_caller]
    pub fn pixel_direction(&self, index: usize) -> Direction {
        assert!(index < self.len(), "pixel {} outside map of {}", index, self.len());
        direction_at(self.resolution, index)
    }

    /// Pixel whose cell contains a direction; the inverse of
    /// [`SkyMap::pixel_direction`] up to pixel quantisation.
    pub fn pixel_index(&self, direction: &Direction) -> usize {
        let columns = 2 * self.resolution;
        let row_f = (90.0 - direction.lat_degrees()) * self.resolution as f64 / 180.0;
        let row = (row_f.floor() as isize).clamp(0, self.resolution as isize - 1) as usize;
        let column_f = direction.lon_degrees().rem_euclid(360.0) * columns as f64 / 360.0;
        let column = (column_f.floor() as usize).min(columns - 1);
        row * columns + column
    }

    pub fn value(&self, index: usize) -> Quantity {
        self.values[index]
    }

    /// Fill every pixel from an integrator, sequentially.
    pub fn fill<F>(&mut self, integrand: F)
    where
        F: Fn(&Direction) -> Quantity,
    {
        debug!("filling sky map of {} pixels", self.len());
        for index in 0..self.values.len() {
            let direction = direction_at(self.resolution, index);
            self.values[index] = integrand(&direction);
        }
    }

    /// Fill every pixel in parallel. Safe because each pixel is written
    /// exactly once and the integrand only reads shared immutable state.
    pub fn par_fill<F>(&mut self, integrand: F)
    where
        F: Fn(&Direction) -> Quantity + Sync,
    {
        debug!("filling sky map of {} pixels in parallel", self.len());
        let resolution = self.resolution;
        self.values
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, value)| {
                *value = integrand(&direction_at(resolution, index));
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{Dimension, DEGREE, MEGAHERTZ};
    use approx::assert_relative_eq;

    #[test]
    fn test_pixel_direction_round_trip() {
        let map = SkyMap::new(16, None);
        for index in [0, 7, 31, 100, map.len() - 1] {
            let direction = map.pixel_direction(index);
            assert_eq!(map.pixel_index(&direction), index);
        }
    }

    #[test]
    fn test_pixel_centres_cover_the_sphere() {
        let map = SkyMap::new(8, None);
        let first = map.pixel_direction(0);
        assert_relative_eq!(first.lat_degrees(), 90.0 - 180.0 / 16.0, epsilon = 1e-12);
        assert_relative_eq!(first.lon_degrees(), 360.0 / 32.0, epsilon = 1e-12);
        let last = map.pixel_direction(map.len() - 1);
        assert_relative_eq!(last.lat_degrees(), -(90.0 - 180.0 / 16.0), epsilon = 1e-12);
    }

    #[test]
    fn test_fill_and_par_fill_agree() {
        let integrand =
            |direction: &Direction| direction.lon + 2.0 * direction.lat + 1.0 * DEGREE;

        let mut sequential = SkyMap::new(8, Some(408.0 * MEGAHERTZ));
        sequential.fill(integrand);
        let mut parallel = SkyMap::new(8, Some(408.0 * MEGAHERTZ));
        parallel.par_fill(integrand);

        for index in 0..sequential.len() {
            assert_eq!(sequential.value(index), parallel.value(index));
            assert_eq!(sequential.value(index).dimension(), Dimension::ANGLE);
        }
    }

    #[test]
    fn test_meta_reports_frequency() {
        let map = SkyMap::new(4, Some(1.0 * MEGAHERTZ));
        let meta = map.meta();
        assert_eq!(meta.resolution, 4);
        assert_relative_eq!(meta.frequency_hz.unwrap(), 1e6);
    }

    #[test]
    #[should_panic(expected = "positive resolution")]
    fn test_zero_resolution_is_rejected() {
        let _ = SkyMap::new(0, None);
    }
}
