//! Line-of-sight integration engines.
//!
//! One engine per emission process, all built on the same quadrature: the
//! ray toward a sky direction is cut into a fixed number of equal steps and
//! the integrand is accumulated as a left-endpoint Riemann sum. The step
//! count trades accuracy for predictable cost; the end products are sky
//! maps, so dense fixed sampling beats adaptive refinement here. Every
//! integrator applies the same rule so maps of different processes are
//! comparable point by point.

mod dispersion;
mod gamma;
mod synchro;

pub use dispersion::DispersionMeasureIntegrator;
pub use gamma::BremsstrahlungIntegrator;
pub use synchro::SynchroIntegrator;

use crate::units::{Dimension, Quantity};

/// Default number of steps along a line of sight.
pub const DEFAULT_LOS_STEPS: usize = 1000;

/// Left-endpoint Riemann sum of `integrand` over `[0, max_distance)` in
/// `steps` equal subdivisions: Σ f(i·Δ)·Δ.
///
/// A zero-or-negative `max_distance` marks a degenerate direction and
/// yields a zero-valued quantity of the integral's dimension, not an error.
#[track_caller]
pub fn los_integral<F>(integrand: F, max_distance: Quantity, steps: usize) -> Quantity
where
    F: Fn(Quantity) -> Quantity,
{
    assert!(steps > 0, "line-of-sight integration needs at least one step");
    let zero_length = Quantity::zero(Dimension::LENGTH);
    if max_distance.value() <= 0.0 {
        let integrand_dim = integrand(zero_length).dimension();
        return Quantity::zero(integrand_dim.combine(Dimension::LENGTH));
    }
    let delta = max_distance / steps as f64;
    let mut total = integrand(zero_length) * delta;
    for i in 1..steps {
        total = total + integrand(delta * i as f64) * delta;
    }
    total
}
