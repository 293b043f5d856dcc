//! Simulated sky maps of diffuse Galactic emission.
//!
//! This crate numerically integrates physical quantities along lines of
//! sight through parametric 3-D models of the interstellar medium —
//! magnetic fields, cosmic-ray electron densities, neutral and ionised gas —
//! to produce all-sky maps of radio synchrotron brightness temperature,
//! gamma-ray bremsstrahlung intensity and dispersion measure.
//!
//! The moving parts, leaves first:
//!
//! - [`units`]: dimension-tagged scalar arithmetic everything else is built
//!   on;
//! - [`grid`] and [`neutralgas`]: the ring-discretised gas survey tables;
//! - [`magneticfields`], [`cosmicrays`], [`chargedgas`]: pluggable spatial
//!   model interfaces;
//! - [`interactions`]: regime-selected bremsstrahlung cross sections with an
//!   optional, correctness-preserving cache;
//! - [`integrators`]: the fixed-step line-of-sight engines, one per
//!   emission process, nesting an energy integral where the physics asks
//!   for one;
//! - [`skymap`]: the pixel container the results land in.
//!
//! Grid file parsing, map serialization and configuration loading are
//! deliberately external: models are constructed from already-loaded data,
//! fail fast on malformed input, and are immutable afterwards, which is
//! what makes the per-pixel work embarrassingly parallel.

pub mod chargedgas;
pub mod cosmicrays;
pub mod geometry;
pub mod grid;
pub mod integrators;
pub mod interactions;
pub mod magneticfields;
pub mod neutralgas;
pub mod skymap;
pub mod units;

pub use geometry::{Direction, GalaxyExtent, SphericalExtent, SUN_POSITION};
pub use grid::{AxisTransform, SkyGrid};
pub use integrators::{
    los_integral, BremsstrahlungIntegrator, DispersionMeasureIntegrator, SynchroIntegrator,
    DEFAULT_LOS_STEPS,
};
pub use interactions::{BremsstrahlungSimple, CrossSectionCache, DifferentialCrossSection};
pub use neutralgas::{GasType, Ring, RingData, RingModel};
pub use skymap::SkyMap;
pub use units::{Dimension, QVector3, Quantity};
