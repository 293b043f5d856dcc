//! Ionised gas (free electron) density models.

use crate::geometry::SUN_POSITION;
use crate::units::{Dimension, QVector3, Quantity};

/// Spatial free-electron density query interface; the integrand of the
/// dispersion measure.
pub trait ChargedGasDensity: Send + Sync {
    /// Electron number density at a position, m⁻³.
    fn density(&self, position: &QVector3) -> Quantity;
}

/// Thick-disc free-electron distribution: exponential in galactocentric
/// radius (referenced to the solar circle) and in height above the plane.
#[derive(Debug, Clone)]
pub struct ExponentialDiscDensity {
    midplane_density: Quantity,
    scale_radius: Quantity,
    scale_height: Quantity,
}

impl ExponentialDiscDensity {
    /// `midplane_density` is the electron density at the solar circle in the
    /// plane, m⁻³.
    #[track_caller]
    pub fn new(midplane_density: Quantity, scale_radius: Quantity, scale_height: Quantity) -> Self {
        if midplane_density.dimension() != Dimension::NUMBER_DENSITY {
            panic!(
                "midplane density must be a number density, got [{}]",
                midplane_density.dimension()
            );
        }
        if scale_radius.dimension() != Dimension::LENGTH
            || scale_height.dimension() != Dimension::LENGTH
            || scale_radius.value() <= 0.0
            || scale_height.value() <= 0.0
        {
            panic!("disc scales must be positive lengths");
        }
        ExponentialDiscDensity {
            midplane_density,
            scale_radius,
            scale_height,
        }
    }
}

impl ChargedGasDensity for ExponentialDiscDensity {
    fn density(&self, position: &QVector3) -> Quantity {
        let r = (position.x() * position.x() + position.y() * position.y()).sqrt();
        let radial = ((SUN_POSITION.x() - r) / self.scale_radius).to_f64().exp();
        let vertical = (-(position.z().abs() / self.scale_height).to_f64()).exp();
        self.midplane_density * radial * vertical
    }
}
