//! Particle interaction cross sections.
//!
//! The gamma-ray integrators only ever see the [`DifferentialCrossSection`]
//! trait; concrete physics lives in the implementations. The optional
//! [`CrossSectionCache`] skips recomputation without ever changing a result.

mod bremsstrahlung;

pub use bremsstrahlung::{BremsstrahlungSimple, HIGH_REGIME_BOUNDARY, LOW_REGIME_BOUNDARY};

use std::collections::HashMap;
use std::sync::RwLock;

use crate::units::{Dimension, Quantity};

/// Differential cross section dσ/dE for producing a quantum of energy
/// `e_gamma` from a projectile of kinetic energy `e_in`.
pub trait DifferentialCrossSection: Send + Sync {
    /// Cross section in m² J⁻¹. Kinematically forbidden combinations yield
    /// zero, never an error.
    fn diff_cross_section(&self, e_in: Quantity, e_gamma: Quantity) -> Quantity;
}

/// Memo table for differential cross sections, keyed on the exact bit
/// patterns of the (incoming, outgoing) energy pair.
///
/// The physics behind a cross section is a pure function, so an entry stays
/// valid for the lifetime of the process: there is no eviction and no
/// expiry. A cached value is bit-identical to what the direct computation
/// returns — caching may only skip work, never change a result. Exact-bits
/// keying puts a constraint on callers: energies must be drawn from a shared
/// discretisation grid, as the integrators in this crate do; energies that
/// merely round-trip through different arithmetic would miss.
///
/// Concurrent fills race benignly: both writers compute the same
/// deterministic value and the first insert wins.
#[derive(Debug, Default)]
pub struct CrossSectionCache {
    entries: RwLock<HashMap<(u64, u64), f64>>,
}

impl CrossSectionCache {
    pub fn new() -> Self {
        CrossSectionCache {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up `(e_in, e_gamma)` or fall back to `compute`, remembering the
    /// result.
    pub fn get_or_compute<F>(&self, e_in: Quantity, e_gamma: Quantity, compute: F) -> Quantity
    where
        F: FnOnce() -> Quantity,
    {
        let key = (e_in.value().to_bits(), e_gamma.value().to_bits());
        if let Some(&value) = self.entries.read().expect("cache lock").get(&key) {
            return Quantity::new(value, Dimension::DIFF_CROSS_SECTION);
        }
        let computed = compute();
        self.entries
            .write()
            .expect("cache lock")
            .entry(key)
            .or_insert(computed.value());
        computed
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("cache lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
