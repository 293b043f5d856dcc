//! Dispersion measure toward the sky.
//!
//! The simplest of the emission products: the free-electron density
//! integrated along the line of sight.

use std::sync::Arc;

use crate::chargedgas::ChargedGasDensity;
use crate::geometry::{galactic_position, Direction, GalaxyExtent, SphericalExtent, SUN_POSITION};
use crate::integrators::{los_integral, DEFAULT_LOS_STEPS};
use crate::units::Quantity;

pub struct DispersionMeasureIntegrator {
    gas: Arc<dyn ChargedGasDensity>,
    extent: Arc<dyn GalaxyExtent>,
    steps: usize,
}

impl DispersionMeasureIntegrator {
    pub fn new(gas: Arc<dyn ChargedGasDensity>) -> Self {
        DispersionMeasureIntegrator {
            gas,
            extent: Arc::new(SphericalExtent::galactic_border()),
            steps: DEFAULT_LOS_STEPS,
        }
    }

    pub fn with_extent(mut self, extent: Arc<dyn GalaxyExtent>) -> Self {
        self.extent = extent;
        self
    }

    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// ∫ nₑ ds toward `direction`, m⁻².
    pub fn integrate_over_los(&self, direction: &Direction) -> Quantity {
        los_integral(
            |distance| {
                self.gas
                    .density(&galactic_position(&SUN_POSITION, distance, direction))
            },
            self.extent.max_distance(direction),
            self.steps,
        )
    }
}
