//! Galactocentric ring model of the neutral gas distribution.
//!
//! Survey gas maps come discretised into annuli around the Galactic centre:
//! one latitude × longitude image per ring. [`RingData`] reads the raw table
//! for a gas species, [`Ring`] pairs one annulus with its radial boundaries
//! and a membership test, and [`RingModel`] owns the lazily built, write-once
//! ring collection the integrators iterate over.
//!
//! Raw table conventions, inherited from the survey products:
//! - HI rows are column densities in cm⁻²; the outermost ring index is a
//!   sentinel with no data and reads as zero everywhere.
//! - CO (integrated line intensity, K km s⁻¹) stores the two innermost annuli
//!   as its final two rows; they are indistinguishable at this resolution and
//!   merge into a single synthetic ring 0, while every other ring reads the
//!   raw table at `ring − 1`. The sentinel rule is the same.

use std::sync::{Arc, OnceLock};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Direction;
use crate::grid::SkyGrid;
use crate::units::{
    Dimension, QVector3, Quantity, CENTIMETRE, KELVIN, KILOMETRE, KILOPARSEC, SECOND,
};

/// Gas species a ring table can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GasType {
    /// Atomic hydrogen, 21 cm column density maps.
    HI,
    /// Molecular gas traced by integrated CO line intensity.
    CO,
}

/// Radial annulus boundaries of the survey ring maps, Galactic centre
/// outwards.
pub static DEFAULT_RING_BOUNDARIES: Lazy<Vec<Quantity>> = Lazy::new(|| {
    [0.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 9.0, 12.0, 15.0, 18.0, 35.0]
        .iter()
        .map(|&r| r * KILOPARSEC)
        .collect()
});

#[derive(Debug, Error)]
pub enum RingModelError {
    #[error("ring boundary table needs at least two entries, got {0}")]
    TooFewBoundaries(usize),

    #[error("ring boundary table must ascend from zero")]
    MalformedBoundaries,

    #[error("boundary table defines {expected} raw rows but the grid has {found}")]
    BoundaryGridMismatch { expected: usize, found: usize },

    #[error("ring index {index} outside boundary table with {rings} rings")]
    RingIndexOutOfTable { index: usize, rings: usize },
}

/// Raw per-ring sky maps for one gas species.
#[derive(Debug)]
pub struct RingData {
    grid: SkyGrid,
    gas: GasType,
}

impl RingData {
    pub fn new(gas: GasType, grid: SkyGrid) -> Self {
        RingData { gas, grid }
    }

    pub fn gas_type(&self) -> GasType {
        self.gas
    }

    /// Number of rows in the raw table, sentinel included.
    pub fn ring_count(&self) -> usize {
        self.grid.rings()
    }

    fn sentinel(&self) -> usize {
        self.grid.rings() - 1
    }

    /// HI column density of one ring toward a direction. The table stores
    /// cm⁻².
    #[track_caller]
    pub fn column_density(&self, ring: usize, direction: &Direction) -> Quantity {
        assert_eq!(
            self.gas,
            GasType::HI,
            "column density is an HI product, this table holds CO"
        );
        if ring == self.sentinel() {
            return Quantity::zero(Dimension::COLUMN_DENSITY);
        }
        Quantity::number(self.grid.value(ring, direction)) / (CENTIMETRE * CENTIMETRE)
    }

    /// Integrated CO line intensity of one ring toward a direction. The
    /// table stores K km s⁻¹; ring 0 merges the two innermost annuli held in
    /// the final two raw rows.
    #[track_caller]
    pub fn co_intensity(&self, ring: usize, direction: &Direction) -> Quantity {
        assert_eq!(
            self.gas,
            GasType::CO,
            "line intensity is a CO product, this table holds HI"
        );
        let unit = KELVIN * KILOMETRE / SECOND;
        let rows = self.grid.rings();
        if ring == 0 {
            let merged =
                self.grid.value(rows - 2, direction) + self.grid.value(rows - 1, direction);
            return merged * unit;
        }
        if ring == self.sentinel() {
            return Quantity::zero(unit.dimension());
        }
        self.grid.value(ring - 1, direction) * unit
    }
}

/// One annulus: its index, radial boundaries and a handle on the raw data.
#[derive(Debug, Clone)]
pub struct Ring {
    index: usize,
    inner: Quantity,
    outer: Quantity,
    data: Arc<RingData>,
}

impl Ring {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn boundaries(&self) -> (Quantity, Quantity) {
        (self.inner, self.outer)
    }

    /// Membership by galactocentric radius projected onto the Galactic
    /// plane, inner inclusive, outer exclusive.
    pub fn contains(&self, position: &QVector3) -> bool {
        let r = (position.x() * position.x() + position.y() * position.y()).sqrt();
        self.inner <= r && r < self.outer
    }

    pub fn column_density(&self, direction: &Direction) -> Quantity {
        self.data.column_density(self.index, direction)
    }

    pub fn co_intensity(&self, direction: &Direction) -> Quantity {
        self.data.co_intensity(self.index, direction)
    }
}

/// Ring-based gas density model: a boundary table plus the lazily built ring
/// collection.
///
/// Rings are constructed on first access behind a `OnceLock` — write-once and
/// idempotent under racing readers — and never mutated afterwards, so
/// concurrent line-of-sight integrations share them freely.
#[derive(Debug)]
pub struct RingModel {
    data: Arc<RingData>,
    boundaries: Vec<Quantity>,
    rings: OnceLock<Vec<Arc<Ring>>>,
}

impl RingModel {
    /// Model over the default survey boundary table.
    pub fn new(data: RingData) -> Result<Self, RingModelError> {
        Self::with_boundaries(data, DEFAULT_RING_BOUNDARIES.clone())
    }

    /// Model over a configuration-supplied boundary table. The table must
    /// ascend from zero, carry lengths, and match the raw table row count
    /// (annuli plus one sentinel row).
    pub fn with_boundaries(
        data: RingData,
        boundaries: Vec<Quantity>,
    ) -> Result<Self, RingModelError> {
        if boundaries.len() < 2 {
            return Err(RingModelError::TooFewBoundaries(boundaries.len()));
        }
        let ascending_lengths = boundaries[0].value() == 0.0
            && boundaries
                .iter()
                .all(|b| b.dimension() == Dimension::LENGTH)
            && boundaries.windows(2).all(|w| w[0].value() < w[1].value());
        if !ascending_lengths {
            return Err(RingModelError::MalformedBoundaries);
        }
        if boundaries.len() != data.ring_count() {
            return Err(RingModelError::BoundaryGridMismatch {
                expected: boundaries.len(),
                found: data.ring_count(),
            });
        }
        Ok(RingModel {
            data: Arc::new(data),
            boundaries,
            rings: OnceLock::new(),
        })
    }

    pub fn gas_type(&self) -> GasType {
        self.data.gas_type()
    }

    /// Number of geometric rings (boundary intervals); the raw table's
    /// sentinel row is not one of them.
    pub fn ring_count(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// The ring collection, built on first use.
    pub fn rings(&self) -> &[Arc<Ring>] {
        self.rings.get_or_init(|| {
            self.boundaries
                .windows(2)
                .enumerate()
                .map(|(index, pair)| {
                    Arc::new(Ring {
                        index,
                        inner: pair[0],
                        outer: pair[1],
                        data: Arc::clone(&self.data),
                    })
                })
                .collect()
        })
    }

    pub fn ring(&self, index: usize) -> Result<&Arc<Ring>, RingModelError> {
        self.rings()
            .get(index)
            .ok_or(RingModelError::RingIndexOutOfTable {
                index,
                rings: self.ring_count(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Ring>> {
        self.rings().iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::AxisTransform;
    use approx::assert_relative_eq;

    /// 3 raw rows (2 annuli + sentinel) over a 3 × 4 all-sky map; row r is
    /// filled with the constant r + 1.
    fn test_grid() -> SkyGrid {
        let lon_axis = AxisTransform::new(3.0, 0.0, -90.0);
        let lat_axis = AxisTransform::new(2.0, 0.0, 60.0);
        let data: Vec<f32> = (0..3)
            .flat_map(|ring| std::iter::repeat((ring + 1) as f32).take(12))
            .collect();
        SkyGrid::new(3, 3, 4, lon_axis, lat_axis, data).unwrap()
    }

    fn test_boundaries() -> Vec<Quantity> {
        vec![0.0 * KILOPARSEC, 1.0 * KILOPARSEC, 2.0 * KILOPARSEC]
    }

    #[test]
    fn test_hi_sentinel_ring_is_zero_everywhere() {
        let data = RingData::new(GasType::HI, test_grid());
        let sentinel = data.ring_count() - 1;
        for lon in [0.0, 90.0, 180.0, 270.0] {
            for lat in [-60.0, 0.0, 60.0] {
                let dir = Direction::from_degrees(lon, lat);
                assert_eq!(data.column_density(sentinel, &dir).value(), 0.0);
            }
        }
    }

    #[test]
    fn test_hi_column_density_scales_from_cm2() {
        let data = RingData::new(GasType::HI, test_grid());
        let dir = Direction::from_degrees(0.0, 0.0);
        let n = data.column_density(0, &dir);
        assert_eq!(n.dimension(), Dimension::COLUMN_DENSITY);
        // 1 cm⁻² = 1e4 m⁻²
        assert_relative_eq!(n.value(), 1.0e4, max_relative = 1e-12);
    }

    #[test]
    fn test_co_ring_zero_merges_two_innermost_rows() {
        let data = RingData::new(GasType::CO, test_grid());
        let dir = Direction::from_degrees(0.0, 0.0);
        let unit = KELVIN * KILOMETRE / SECOND;
        // Rows hold 1, 2, 3; the innermost annuli are the final two rows.
        assert_relative_eq!(
            data.co_intensity(0, &dir).in_units_of(unit),
            2.0 + 3.0
        );
        // Every other ring reads the raw table at ring − 1.
        assert_relative_eq!(data.co_intensity(1, &dir).in_units_of(unit), 1.0);
        // Sentinel reads zero.
        assert_eq!(data.co_intensity(2, &dir).value(), 0.0);
    }

    #[test]
    #[should_panic(expected = "CO product")]
    fn test_co_lookup_on_hi_table_panics() {
        let data = RingData::new(GasType::HI, test_grid());
        let _ = data.co_intensity(0, &Direction::from_degrees(0.0, 0.0));
    }

    #[test]
    fn test_ring_membership_is_half_open() {
        let model =
            RingModel::with_boundaries(RingData::new(GasType::HI, test_grid()), test_boundaries())
                .unwrap();
        let inner = model.ring(0).unwrap();
        let outer = model.ring(1).unwrap();

        let at = |kpc: f64| {
            QVector3::new(kpc * KILOPARSEC, 0.0 * KILOPARSEC, 5.0 * KILOPARSEC)
        };
        // Height above the plane is ignored: membership is projected.
        assert!(inner.contains(&at(0.5)));
        assert!(!inner.contains(&at(1.0)));
        assert!(outer.contains(&at(1.0)));
        assert!(!outer.contains(&at(2.0)));
    }

    #[test]
    fn test_ring_container_is_built_once() {
        let model =
            RingModel::with_boundaries(RingData::new(GasType::HI, test_grid()), test_boundaries())
                .unwrap();
        let first = model.rings().as_ptr();
        let second = model.rings().as_ptr();
        assert_eq!(first, second);
        assert_eq!(model.ring_count(), 2);
    }

    #[test]
    fn test_boundary_validation() {
        let grid = test_grid();
        let descending = vec![0.0 * KILOPARSEC, 2.0 * KILOPARSEC, 1.0 * KILOPARSEC];
        assert!(matches!(
            RingModel::with_boundaries(RingData::new(GasType::HI, grid), descending),
            Err(RingModelError::MalformedBoundaries)
        ));

        let not_lengths = vec![0.0 * SECOND, 1.0 * SECOND, 2.0 * SECOND];
        assert!(matches!(
            RingModel::with_boundaries(RingData::new(GasType::HI, test_grid()), not_lengths),
            Err(RingModelError::MalformedBoundaries)
        ));

        let wrong_count = vec![0.0 * KILOPARSEC, 1.0 * KILOPARSEC];
        assert!(matches!(
            RingModel::with_boundaries(RingData::new(GasType::HI, test_grid()), wrong_count),
            Err(RingModelError::BoundaryGridMismatch { .. })
        ));
    }

    #[test]
    fn test_ring_index_outside_table_is_an_error() {
        let model =
            RingModel::with_boundaries(RingData::new(GasType::HI, test_grid()), test_boundaries())
                .unwrap();
        assert!(matches!(
            model.ring(2),
            Err(RingModelError::RingIndexOutOfTable { index: 2, rings: 2 })
        ));
    }

    #[test]
    fn test_default_boundaries_span_the_survey_table() {
        assert_eq!(DEFAULT_RING_BOUNDARIES.len(), 12);
        assert_eq!(DEFAULT_RING_BOUNDARIES[0].value(), 0.0);
        assert_relative_eq!(
            DEFAULT_RING_BOUNDARIES[11].in_units_of(KILOPARSEC),
            35.0
        );
    }
}
