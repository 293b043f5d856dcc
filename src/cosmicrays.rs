//! Cosmic-ray particle density models.
//!
//! A model answers "how many particles per volume per energy sit at this
//! position" and exposes its native energy discretisation. The energy
//! integrator picks its strategy from the [`EnergySampling`] capability flag
//! alone — never by looking inside a model.

use crate::geometry::SUN_POSITION;
use crate::units::{Dimension, QVector3, Quantity};

/// How a model's energy grid is meant to be integrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergySampling {
    /// A finite list of representative energies (narrow or delta-like
    /// spectra); integrate by summing over the listed points weighted by
    /// their spacing.
    Explicit,
    /// A continuous spectrum sampled on a logarithmically spaced grid;
    /// integrate with the fixed quadrature rule over that grid.
    Logarithmic,
}

/// Spatial cosmic-ray density query interface.
pub trait CosmicRayDensity: Send + Sync {
    fn sampling(&self) -> EnergySampling;

    /// The model's native energy grid, ascending.
    fn energies(&self) -> &[Quantity];

    /// Particle density per unit energy at a position, m⁻³ J⁻¹.
    fn density_per_energy(&self, position: &QVector3, energy: Quantity) -> Quantity;
}

/// Power-law electron spectrum on a log-spaced energy grid with an
/// exponential-disc spatial profile, unity at the solar circle.
#[derive(Debug, Clone)]
pub struct PowerLawDensity {
    reference_density: Quantity,
    reference_energy: Quantity,
    spectral_index: f64,
    scale_radius: Quantity,
    scale_height: Quantity,
    energies: Vec<Quantity>,
}

impl PowerLawDensity {
    /// `reference_density` is dn/dE at `reference_energy` at the Sun,
    /// m⁻³ J⁻¹; the grid spans `[e_min, e_max]` with `samples`
    /// logarithmically spaced points.
    #[track_caller]
    pub fn new(
        reference_density: Quantity,
        reference_energy: Quantity,
        spectral_index: f64,
        e_min: Quantity,
        e_max: Quantity,
        samples: usize,
    ) -> Self {
        if reference_density.dimension() != Dimension::DENSITY_PER_ENERGY {
            panic!(
                "reference density must be per volume per energy, got [{}]",
                reference_density.dimension()
            );
        }
        if reference_energy.dimension() != Dimension::ENERGY
            || e_min.dimension() != Dimension::ENERGY
            || e_max.dimension() != Dimension::ENERGY
        {
            panic!("energy bounds must carry the energy dimension");
        }
        if samples < 2 || e_min.value() <= 0.0 || e_max.value() <= e_min.value() {
            panic!("energy grid needs at least two samples over a positive ascending range");
        }
        let ratio = (e_max.value() / e_min.value()).powf(1.0 / (samples - 1) as f64);
        let energies = (0..samples)
            .map(|i| e_min * ratio.powi(i as i32))
            .collect();
        PowerLawDensity {
            reference_density,
            reference_energy,
            spectral_index,
            scale_radius: Quantity::zero(Dimension::LENGTH),
            scale_height: Quantity::zero(Dimension::LENGTH),
            energies,
        }
    }

    /// Add an exponential fall-off with galactocentric radius and height
    /// above the plane. Zero scales (the default) mean a spatially uniform
    /// model.
    pub fn with_disc_profile(mut self, scale_radius: Quantity, scale_height: Quantity) -> Self {
        self.scale_radius = scale_radius;
        self.scale_height = scale_height;
        self
    }

    fn spatial_profile(&self, position: &QVector3) -> f64 {
        let mut profile = 1.0;
        if self.scale_radius.value() > 0.0 {
            let r = (position.x() * position.x() + position.y() * position.y()).sqrt();
            let r_sun = SUN_POSITION.x();
            profile *= ((r_sun - r) / self.scale_radius).to_f64().exp();
        }
        if self.scale_height.value() > 0.0 {
            profile *= (-(position.z().abs() / self.scale_height).to_f64()).exp();
        }
        profile
    }
}

impl CosmicRayDensity for PowerLawDensity {
    fn sampling(&self) -> EnergySampling {
        EnergySampling::Logarithmic
    }

    fn energies(&self) -> &[Quantity] {
        &self.energies
    }

    fn density_per_energy(&self, position: &QVector3, energy: Quantity) -> Quantity {
        let e_ratio = (energy / self.reference_energy).to_f64();
        if e_ratio <= 0.0 {
            return Quantity::zero(Dimension::DENSITY_PER_ENERGY);
        }
        self.reference_density * e_ratio.powf(-self.spectral_index) * self.spatial_profile(position)
    }
}
