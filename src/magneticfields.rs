//! Galactic magnetic field models.

use crate::units::{Dimension, QVector3};

/// Spatial magnetic field query interface. Implementations are immutable
/// after construction so integrators can share them across threads.
pub trait MagneticField: Send + Sync {
    /// Field vector at a galactocentric position, in tesla.
    fn field(&self, position: &QVector3) -> QVector3;
}

/// The same field vector everywhere; the simplest model and the standard
/// fixture for integrator calibration.
#[derive(Debug, Clone)]
pub struct UniformMagneticField {
    value: QVector3,
}

impl UniformMagneticField {
    #[track_caller]
    pub fn new(value: QVector3) -> Self {
        if value.dimension() != Dimension::MAGNETIC_FLUX_DENSITY {
            panic!(
                "magnetic field components must be flux densities, got [{}]",
                value.dimension()
            );
        }
        UniformMagneticField { value }
    }
}

impl MagneticField for UniformMagneticField {
    fn field(&self, _position: &QVector3) -> QVector3 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{MICROGAUSS, SECOND};

    #[test]
    fn test_uniform_field_is_position_independent() {
        let field = UniformMagneticField::new(QVector3::new(
            0.0 * MICROGAUSS,
            0.0 * MICROGAUSS,
            1.0 * MICROGAUSS,
        ));
        let origin = QVector3::zeros(Dimension::LENGTH);
        assert_eq!(field.field(&origin).z().value(), 1e-10);
    }

    #[test]
    #[should_panic(expected = "flux densities")]
    fn test_rejects_wrong_dimension() {
        let _ = UniformMagneticField::new(QVector3::new(
            1.0 * SECOND,
            0.0 * SECOND,
            0.0 * SECOND,
        ));
    }
}
