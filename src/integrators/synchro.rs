//! Galactic synchrotron radio emission.
//!
//! The emissivity at a point folds the local cosmic-ray electron spectrum
//! with the single-electron synchrotron kernel in the magnetic field
//! component perpendicular to the line of sight; integrating that along the
//! ray and converting through the Rayleigh-Jeans law gives the brightness
//! temperature a radio survey would map.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::cosmicrays::{CosmicRayDensity, EnergySampling};
use crate::geometry::{galactic_position, Direction, GalaxyExtent, SphericalExtent, SUN_POSITION};
use crate::integrators::{los_integral, DEFAULT_LOS_STEPS};
use crate::magneticfields::MagneticField;
use crate::units::{
    Dimension, QVector3, Quantity, C_LIGHT, EPSILON_0, E_PLUS, K_BOLTZMANN, M_ELECTRON,
};

/// √3 e³ / (8 π² ε₀ c mₑ), the scale of the single-electron synchrotron
/// power per unit frequency per unit field.
fn synchro_constant() -> Quantity {
    (3.0f64.sqrt() * E_PLUS.powi(3))
        / (8.0 * PI * PI * EPSILON_0 * C_LIGHT * M_ELECTRON)
}

/// Characteristic synchrotron frequency ν_c = 3γ²eB⊥/(4π mₑ) of an electron
/// of total energy `energy` in a perpendicular field `b_perp`.
pub fn critical_frequency(energy: Quantity, b_perp: Quantity) -> Quantity {
    let gamma = (energy / (M_ELECTRON * C_LIGHT * C_LIGHT)).to_f64();
    3.0 * gamma * gamma / (4.0 * PI) * (E_PLUS * b_perp / M_ELECTRON)
}

/// First synchrotron function F(x) = x ∫ₓ^∞ K₅⁄₃(ξ) dξ, in the asymptotic
/// fit of Aharonian, Kelner & Prosekin (2010).
///
/// The fit keeps both limits honest: it matches the 2.15 x^(1/3) power law
/// for x → 0 and the √(πx/2) e⁻ˣ cutoff for x → ∞, and reproduces
/// F(1) ≈ 0.655 (Longair, Table 8.1) to better than a percent.
pub fn synchrotron_f(x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    let x23 = x.cbrt() * x.cbrt();
    let x43 = x23 * x23;
    2.15 * x.cbrt()
        * (1.0 + 3.06 * x).powf(1.0 / 6.0)
        * (1.0 + 0.884 * x23 + 0.471 * x43)
        / (1.0 + 1.64 * x23 + 0.974 * x43)
        * (-x).exp()
}

/// Synchrotron brightness-temperature integrator over a magnetic field
/// model and a cosmic-ray electron density.
pub struct SynchroIntegrator {
    field: Arc<dyn MagneticField>,
    crdensity: Arc<dyn CosmicRayDensity>,
    extent: Arc<dyn GalaxyExtent>,
    steps: usize,
}

impl SynchroIntegrator {
    pub fn new(field: Arc<dyn MagneticField>, crdensity: Arc<dyn CosmicRayDensity>) -> Self {
        SynchroIntegrator {
            field,
            crdensity,
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

    /// Magnitude of the field component perpendicular to the line of sight
    /// through `position` (the emission only feels B⊥). At the observer
    /// itself there is no line of sight yet; the full field magnitude is
    /// used there.
    fn perpendicular_field(&self, position: &QVector3) -> Quantity {
        let b = self.field.field(position);
        let los = *position - *SUN_POSITION;
        if los.norm().value() == 0.0 {
            return b.norm();
        }
        let unit = QVector3::from_vector3(los.as_vector3() / los.norm().value(), Dimension::NONE);
        b.cross(&unit).norm()
    }

    /// Power radiated per unit frequency by one electron: the synchrotron
    /// kernel const · B⊥ · F(ν/ν_c).
    pub fn single_electron_emission(
        &self,
        frequency: Quantity,
        energy: Quantity,
        b_perp: Quantity,
    ) -> Quantity {
        if b_perp.value() <= 0.0 {
            return Quantity::zero(Dimension::ENERGY);
        }
        let x = (frequency / critical_frequency(energy, b_perp)).to_f64();
        synchro_constant() * b_perp * synchrotron_f(x)
    }

    /// Local emissivity: the electron spectrum folded with the kernel at a
    /// fixed position, J m⁻³ (per unit time and frequency, which cancel).
    ///
    /// The integration strategy follows the density model's capability flag:
    /// an explicit energy list is summed point by point weighted by the
    /// spacing to the neighbouring energy, a continuous log-spaced spectrum
    /// goes through the same left-endpoint quadrature as the line-of-sight
    /// integrals. Both converge to the same answer for the same spectrum.
    pub fn integrate_over_energy(&self, position: &QVector3, frequency: Quantity) -> Quantity {
        let energies = self.crdensity.energies();
        if energies.len() < 2 {
            return Quantity::zero(Dimension::EMISSIVITY);
        }
        let b_perp = self.perpendicular_field(position);
        let kernel = |energy: Quantity| {
            self.single_electron_emission(frequency, energy, b_perp)
                * self.crdensity.density_per_energy(position, energy)
        };

        let mut total = Quantity::zero(Dimension::EMISSIVITY);
        match self.crdensity.sampling() {
            EnergySampling::Explicit => {
                // Every listed energy contributes, the last one weighted by
                // the spacing below it.
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

    /// Brightness temperature toward a sky direction at the given observing
    /// frequency: the line-of-sight emissivity integral divided by 4π
    /// steradian, converted through the Rayleigh-Jeans law
    /// T = c² I / (2 k_B ν²).
    pub fn integrate_over_los(&self, direction: &Direction, frequency: Quantity) -> Quantity {
        let max_distance = self.extent.max_distance(direction);
        let integral = los_integral(
            |distance| {
                let position = galactic_position(&SUN_POSITION, distance, direction);
                self.integrate_over_energy(&position, frequency)
            },
            max_distance,
            self.steps,
        );
        let intensity = integral / (4.0 * PI);
        C_LIGHT * C_LIGHT * intensity / (2.0 * K_BOLTZMANN * frequency * frequency)
    }
}
