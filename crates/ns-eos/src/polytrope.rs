//! Polytropic reference EOS.

use crate::error::EosResult;
use crate::model::validation::{validate_gamma, validate_positive};
use crate::model::{EquationOfState, ValidityBounds};
use ns_core::constants::NUCLEON_MASS_MEV;

/// P = K n^Γ with energy density ε = m n + P / (Γ - 1).
///
/// The proton fraction is ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct Polytrope {
    name: String,
    k: f64,
    gamma: f64,
    rest_mass: f64,
    max_density: f64,
}

impl Polytrope {
    /// Polytrope with nucleon rest mass, valid up to `max_density` [fm^-3].
    pub fn new(k: f64, gamma: f64, max_density: f64) -> EosResult<Self> {
        Self::with_rest_mass(k, gamma, NUCLEON_MASS_MEV, max_density)
    }

    pub fn with_rest_mass(k: f64, gamma: f64, rest_mass: f64, max_density: f64) -> EosResult<Self> {
        validate_positive(k, "polytropic constant")?;
        validate_gamma(gamma)?;
        validate_positive(rest_mass, "rest mass")?;
        validate_positive(max_density, "max density")?;
        Ok(Self {
            name: format!("polytrope(K={k},gamma={gamma})"),
            k,
            gamma,
            rest_mass,
            max_density,
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Density at which the polytrope reaches pressure `p` (closed form).
    pub fn density_at_pressure(&self, p: f64) -> f64 {
        (p / self.k).powf(1.0 / self.gamma)
    }
}

impl EquationOfState for Polytrope {
    fn name(&self) -> &str {
        &self.name
    }

    fn pressure(&self, density: f64, _proton_fraction: f64) -> f64 {
        self.k * density.powf(self.gamma)
    }

    fn d_pressure(&self, density: f64, _proton_fraction: f64) -> f64 {
        self.gamma * self.k * density.powf(self.gamma - 1.0)
    }

    fn energy_density(&self, density: f64, proton_fraction: f64) -> f64 {
        self.rest_mass * density + self.pressure(density, proton_fraction) / (self.gamma - 1.0)
    }

    fn validity(&self) -> ValidityBounds {
        ValidityBounds {
            max_density: self.max_density,
            max_energy: self.energy_density(self.max_density, 0.0),
            max_pressure: self.pressure(self.max_density, 0.0),
        }
    }
}
