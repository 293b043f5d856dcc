//! Diffuse gamma-ray bremsstrahlung.
//!
//! Cosmic-ray electrons radiate on the neutral gas. The gas distribution is
//! only known as ring-discretised column densities, so the line of sight is
//! combined ring by ring: the local production rate per hydrogen atom is
//! averaged over the ray samples falling inside each annulus and scaled by
//! that annulus's measured column density toward the direction. Rings the
//! ray never enters contribute nothing.
//!
//! The per-atom rate nests an energy integral inside the line-of-sight
//! pass, evaluated on the density model's energy grid; with a ring map's
//! worth of directions the same (E, Eγ) pairs recur constantly, which is
//! what the cross-section cache is for.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::cosmicrays::{CosmicRayDensity, EnergySampling};
use crate::geometry::{galactic_position, Direction, GalaxyExtent, SphericalExtent, SUN_POSITION};
use crate::integrators::DEFAULT_LOS_STEPS;
use crate::interactions::DifferentialCrossSection;
use crate::neutralgas::{GasType, RingModel};
use crate::units::{Dimension, QVector3, Quantity, C_LIGHT};

pub struct BremsstrahlungIntegrator {
    crdensity: Arc<dyn CosmicRayDensity>,
    gas: Arc<RingModel>,
    cross_section: Arc<dyn DifferentialCrossSection>,
    extent: Arc<dyn GalaxyExtent>,
    steps: usize,
}

impl BremsstrahlungIntegrator {
    /// `gas` must be an HI ring model: the emission scales with hydrogen
    /// column density, not line intensity.
    #[track_caller]
    pub fn new(
        crdensity: Arc<dyn CosmicRayDensity>,
        gas: Arc<RingModel>,
        cross_section: Arc<dyn DifferentialCrossSection>,
    ) -> Self {
        assert_eq!(
            gas.gas_type(),
            GasType::HI,
            "bremsstrahlung integration needs an HI column-density ring model"
        );
        BremsstrahlungIntegrator {
            crdensity,
            gas,
            cross_section,
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

    /// Photons of energy `e_gamma` produced per hydrogen atom per unit time
    /// per unit photon energy at a position, s⁻¹ J⁻¹.
    ///
    /// The electron flux is c·n(E) — the projectiles relevant here are
    /// relativistic. The energy quadrature follows the density model's
    /// capability flag, mirroring the synchrotron path.
    pub fn emission_per_atom(&self, position: &QVector3, e_gamma: Quantity) -> Quantity {
        let energies = self.crdensity.energies();
        if energies.len() < 2 {
            return Quantity::zero(Dimension::PHOTON_RATE_PER_ENERGY);
        }
        let kernel = |energy: Quantity| {
            C_LIGHT
                * self.crdensity.density_per_energy(position, energy)
                * self.cross_section.diff_cross_section(energy, e_gamma)
        };

        let mut total = Quantity::zero(Dimension::PHOTON_RATE_PER_ENERGY);
        match self.crdensity.sampling() {
            EnergySampling::Explicit => {
                for i in 0..energies.len() {
                    let spacing = if i + 1 < energies.len() {
                        energies[i + 1] - energies[i]
                    } else {
                        energies[i] - energies[i - 1]
                    };
                    total = total + kernel(energies[i]) * spacing;
                }
            }
            EnergySampling::Logarithmic => {
                for i in 0..energies.len() - 1 {
                    total = total + kernel(energies[i]) * (energies[i + 1] - energies[i]);
                }
            }
        }
        total
    }

    /// Differential photon intensity toward a direction, m⁻² s⁻¹ J⁻¹ (per
    /// steradian): Σ over rings of ⟨per-atom rate⟩ × ring column density,
    /// divided by 4π.
    pub fn integrate_over_los(&self, direction: &Direction, e_gamma: Quantity) -> Quantity {
        let max_distance = self.extent.max_distance(direction);
        let zero = Quantity::zero(Dimension::DIFF_PHOTON_INTENSITY);
        if max_distance.value() <= 0.0 {
            return zero;
        }

        let rings = self.gas.rings();
        let mut sums =
            vec![Quantity::zero(Dimension::PHOTON_RATE_PER_ENERGY); rings.len()];
        let mut counts = vec![0usize; rings.len()];

        let delta = max_distance / self.steps as f64;
        for i in 0..self.steps {
            let position = galactic_position(&SUN_POSITION, delta * i as f64, direction);
            if let Some(ring) = rings.iter().find(|ring| ring.contains(&position)) {
                sums[ring.index()] =
                    sums[ring.index()] + self.emission_per_atom(&position, e_gamma);
                counts[ring.index()] += 1;
            }
        }

        let mut total = zero;
        for ring in rings {
            let count = counts[ring.index()];
            if count == 0 {
                continue;
            }
            let mean_rate = sums[ring.index()] / count as f64;
            total = total + mean_rate * ring.column_density(direction);
        }
        total / (4.0 * PI)
    }
}
