//! Electron bremsstrahlung differential cross sections.
//!
//! Three closed-form approximations cover the projectile kinetic-energy
//! range, following the treatment of Koch & Motz (1959) as adopted for
//! interstellar emission by Strong & Moskalenko (1998):
//!
//! - below 70 keV, the non-relativistic Born formula 3BN(a) with the Elwert
//!   (1939) Coulomb correction;
//! - up to the complete-screening handover, the exact-Born matrix element
//!   3BN with the same Elwert factor and a smoothly switched-on
//!   target-electron term;
//! - above that, the complete-screening asymptotic form with the Tsai (1974)
//!   radiation logarithms.
//!
//! The regime boundaries are calibration constants, not free choices: the
//! low boundary is the 70 keV of Strong & Moskalenko, and the handover to
//! complete screening sits at 137 MeV, where the unscreened Born and the
//! complete-screening forms intersect for hydrogen at mid-range photon
//! energies, keeping the cross section continuous across the switch.
//!
//! All internal arithmetic runs in electron natural units (energies in units
//! of mₑc², momenta in mₑc); the public surface speaks `Quantity`.

use once_cell::sync::Lazy;

use super::{CrossSectionCache, DifferentialCrossSection};
use crate::units::{Dimension, Quantity, C_LIGHT, MEGAELECTRONVOLT, M_ELECTRON};

/// Fine-structure constant, CODATA 2006.
const ALPHA: f64 = 7.297_352_537_6e-3;
/// Classical electron radius in metres, CODATA 2006.
const R_ELECTRON: f64 = 2.817_940_289_4e-15;

/// Kinetic-energy boundary below which the non-relativistic Born formula is
/// used: 70 keV.
pub static LOW_REGIME_BOUNDARY: Lazy<Quantity> = Lazy::new(|| 0.07 * MEGAELECTRONVOLT);
/// Kinetic-energy boundary above which complete screening takes over:
/// 137 MeV (see module docs).
pub static HIGH_REGIME_BOUNDARY: Lazy<Quantity> = Lazy::new(|| 137.0 * MEGAELECTRONVOLT);

/// Tsai (1974) radiation logarithms L_rad and L'_rad for light elements.
fn radiation_logarithms(z: u32) -> (f64, f64) {
    match z {
        1 => (5.31, 6.144),
        2 => (4.79, 5.621),
        3 => (4.74, 5.805),
        4 => (4.71, 5.924),
        _ => {
            let z = z as f64;
            ((184.15 / z.powf(1.0 / 3.0)).ln(), (1194.0 / z.powf(2.0 / 3.0)).ln())
        }
    }
}

/// Bremsstrahlung on a neutral atomic target with `z` protons and
/// `n_electrons` bound electrons; hydrogen by default.
///
/// Caching is opt-in. Cached lookups return bit-identical results to the
/// direct evaluation; see [`CrossSectionCache`] for the exact-key caveat.
#[derive(Debug)]
pub struct BremsstrahlungSimple {
    z: u32,
    n_electrons: u32,
    cache: Option<CrossSectionCache>,
}

impl BremsstrahlungSimple {
    pub fn new() -> Self {
        BremsstrahlungSimple {
            z: 1,
            n_electrons: 1,
            cache: None,
        }
    }

    pub fn for_target(z: u32, n_electrons: u32) -> Self {
        BremsstrahlungSimple {
            z,
            n_electrons,
            cache: None,
        }
    }

    pub fn enable_caching(&mut self) {
        if self.cache.is_none() {
            self.cache = Some(CrossSectionCache::new());
        }
    }

    pub fn disable_caching(&mut self) {
        self.cache = None;
    }

    pub fn caching_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Elwert (1939) Coulomb correction from the incoming and outgoing
    /// velocities (in units of c) and the nuclear charge.
    pub fn elwert_factor(&self, beta_i: f64, beta_f: f64) -> f64 {
        let a = 2.0 * std::f64::consts::PI * self.z as f64 * ALPHA;
        (beta_i * (1.0 - (-a / beta_i).exp())) / (beta_f * (1.0 - (-a / beta_f).exp()))
    }

    /// Weight of the target-electron contribution, switching on as the
    /// projectile becomes relativistic. `t` is the kinetic energy in mₑc²
    /// units. The full electron-electron treatment (Haug 1975) is out of
    /// scope; this interpolation vanishes where recoil suppresses the e-e
    /// channel and saturates at one well below the complete-screening
    /// handover.
    fn electron_target_weight(t: f64) -> f64 {
        // Half-weight point at 2 MeV ≈ 3.914 mₑc².
        const T_HALF: f64 = 3.914;
        t * t / (t * t + T_HALF * T_HALF)
    }

    /// Non-relativistic Born cross section 3BN(a) with the Elwert factor,
    /// in units of α r₀² per mₑc² of photon energy. Momenta in mₑc, photon
    /// energy `k` in mₑc².
    pub fn dsdk_low_energy(&self, p_i: f64, p_f: f64, k: f64) -> f64 {
        let beta_i = p_i / (1.0 + p_i * p_i).sqrt();
        let beta_f = p_f / (1.0 + p_f * p_f).sqrt();
        let z2 = (self.z * self.z) as f64;
        (16.0 / 3.0) * z2 / (k * p_i * p_i)
            * ((p_i + p_f) / (p_i - p_f)).ln()
            * self.elwert_factor(beta_i, beta_f)
    }

    /// Exact-Born cross section 3BN of Koch & Motz (1959), Elwert-corrected,
    /// with the target-electron term switched on by projectile energy. Same
    /// units and conventions as [`Self::dsdk_low_energy`].
    pub fn dsdk_intermediate_energy(
        &self,
        gamma_i: f64,
        gamma_f: f64,
        p_i: f64,
        p_f: f64,
        k: f64,
    ) -> f64 {
        let eps_i = 2.0 * (gamma_i + p_i).ln();
        let eps_f = 2.0 * (gamma_f + p_f).ln();
        let big_l = 2.0 * ((gamma_i * gamma_f + p_i * p_f - 1.0) / k).ln();

        let pi2 = p_i * p_i;
        let pf2 = p_f * p_f;
        let pi3 = pi2 * p_i;
        let pf3 = pf2 * p_f;
        let gg = gamma_i * gamma_f;

        let l_bracket = 8.0 * gg / (3.0 * p_i * p_f)
            + k * k * (gg * gg + pi2 * pf2) / (pi3 * pf3)
            + (k / (2.0 * p_i * p_f))
                * ((gg + pi2) * eps_i / pi3 - (gg + pf2) * eps_f / pf3
                    + 2.0 * k * gg / (pi2 * pf2));

        let term = 4.0 / 3.0 - 2.0 * gg * (pi2 + pf2) / (pi2 * pf2)
            + eps_i * gamma_f / pi3
            + eps_f * gamma_i / pf3
            - eps_i * eps_f / (p_i * p_f)
            + big_l * l_bracket;

        let t = gamma_i - 1.0;
        let weight = (self.z * self.z) as f64
            + self.n_electrons as f64 * Self::electron_target_weight(t);
        let beta_i = p_i / gamma_i;
        let beta_f = p_f / gamma_f;
        weight * (p_f / p_i) * term / k * self.elwert_factor(beta_i, beta_f)
    }

    /// Complete-screening asymptotic cross section with Tsai radiation
    /// logarithms. Same units as [`Self::dsdk_low_energy`]; `gamma_i` is the
    /// total projectile energy in mₑc².
    pub fn dsdk_high_energy(&self, gamma_i: f64, k: f64) -> f64 {
        let (l_rad, l_rad_prime) = radiation_logarithms(self.z);
        let z2 = (self.z * self.z) as f64;
        let n = self.n_electrons as f64;
        let y = k / gamma_i;
        let shape = 4.0 / 3.0 - 4.0 / 3.0 * y + y * y;
        4.0 / k * (shape * (z2 * l_rad + n * l_rad_prime) + (z2 + n) * (1.0 - y) / 9.0)
    }

    /// Evaluate without consulting the cache.
    pub fn diff_cross_section_directly(&self, e_in: Quantity, e_gamma: Quantity) -> Quantity {
        let mc2 = M_ELECTRON * C_LIGHT * C_LIGHT;
        let t = (e_in / mc2).to_f64();
        let k = (e_gamma / mc2).to_f64();

        // The photon cannot carry off more than the kinetic energy; the
        // bremsstrahlung tip just below that limit is numerically delicate
        // (two diverging Born terms cancel) and carries no weight in the
        // energy integrals, so it reads as zero too.
        if k <= 0.0 || t - k <= 1e-4 {
            return Quantity::zero(Dimension::DIFF_CROSS_SECTION);
        }

        let gamma_i = 1.0 + t;
        let gamma_f = gamma_i - k;
        let p_i = (gamma_i * gamma_i - 1.0).sqrt();
        let p_f = (gamma_f * gamma_f - 1.0).sqrt();

        let dimensionless = if e_in < *LOW_REGIME_BOUNDARY {
            self.dsdk_low_energy(p_i, p_f, k)
        } else if e_in < *HIGH_REGIME_BOUNDARY {
            self.dsdk_intermediate_energy(gamma_i, gamma_f, p_i, p_f, k)
        } else {
            self.dsdk_high_energy(gamma_i, k)
        };

        let scale = ALPHA * R_ELECTRON * R_ELECTRON;
        Quantity::new(scale * dimensionless, Dimension::AREA) / mc2
    }
}

impl DifferentialCrossSection for BremsstrahlungSimple {
    fn diff_cross_section(&self, e_in: Quantity, e_gamma: Quantity) -> Quantity {
        match &self.cache {
            Some(cache) => cache.get_or_compute(e_in, e_gamma, || {
                self.diff_cross_section_directly(e_in, e_gamma)
            }),
            None => self.diff_cross_section_directly(e_in, e_gamma),
        }
    }
}
