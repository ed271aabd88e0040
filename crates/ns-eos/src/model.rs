//! Equation-of-state trait and validation helpers.

use crate::error::EosResult;
use crate::grid::DensityGrid;
use crate::table::{EosTableRow, write_rows};
use ns_core::constants::SATURATION_DENSITY;
use std::io::Write;

/// Upper edge of the domain over which an EOS is analytically valid.
///
/// Captured once by consumers; beyond these values results are meaningless.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidityBounds {
    /// Highest valid baryon density [fm^-3]
    pub max_density: f64,
    /// Energy density at `max_density` [MeV fm^-3]
    pub max_energy: f64,
    /// Pressure at `max_density` [MeV fm^-3]
    pub max_pressure: f64,
}

impl ValidityBounds {
    /// Return a summary string (for debugging).
    pub fn summary(&self) -> String {
        format!(
            "Valid(n<={:.4}fm^-3,e<={:.3}MeV/fm^3,P<={:.3}MeV/fm^3)",
            self.max_density, self.max_energy, self.max_pressure
        )
    }
}

/// Trait for nuclear equations of state.
///
/// Implementations must be thread-safe (Send + Sync) so that batch sweeps can
/// evaluate independent candidates in parallel. Queries never fail: outside the
/// valid domain an implementation returns whatever its functional form gives,
/// and non-finite values are filtered where they matter (table writing).
pub trait EquationOfState: Send + Sync {
    /// Get the model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Pressure [MeV fm^-3] at baryon density [fm^-3] and proton fraction.
    fn pressure(&self, density: f64, proton_fraction: f64) -> f64;

    /// dP/dn [MeV] at baryon density and proton fraction.
    fn d_pressure(&self, density: f64, proton_fraction: f64) -> f64;

    /// Energy density [MeV fm^-3] at baryon density and proton fraction.
    fn energy_density(&self, density: f64, proton_fraction: f64) -> f64;

    /// Domain over which the model is valid.
    fn validity(&self) -> ValidityBounds;

    /// Reference density used as the default inversion starting point.
    fn saturation_density(&self) -> f64 {
        SATURATION_DENSITY
    }

    /// Vectorized [`EquationOfState::pressure`].
    fn pressures(&self, densities: &[f64], proton_fraction: f64) -> Vec<f64> {
        densities
            .iter()
            .map(|&n| self.pressure(n, proton_fraction))
            .collect()
    }

    /// Vectorized [`EquationOfState::energy_density`].
    fn energy_densities(&self, densities: &[f64], proton_fraction: f64) -> Vec<f64> {
        densities
            .iter()
            .map(|&n| self.energy_density(n, proton_fraction))
            .collect()
    }

    /// Density samples written to the integrator table.
    fn table_grid(&self) -> DensityGrid {
        DensityGrid::standard(self.validity().max_density)
    }

    /// Table rows over [`EquationOfState::table_grid`] for symmetric-to-neutron
    /// matter at proton fraction 0, skipping non-finite energy or pressure.
    fn table_rows(&self) -> Vec<EosTableRow> {
        let densities = self.table_grid().points();
        let energies = self.energy_densities(&densities, 0.0);
        let pressures = self.pressures(&densities, 0.0);
        densities
            .into_iter()
            .zip(energies)
            .zip(pressures)
            .filter(|((_, e), p)| e.is_finite() && p.is_finite())
            .map(|((density, energy_density), pressure)| EosTableRow {
                energy_density,
                pressure,
                density,
            })
            .collect()
    }

    /// Write the full-domain table to `out`; returns the number of rows.
    fn write_table(&self, out: &mut dyn Write) -> EosResult<usize> {
        let rows = self.table_rows();
        write_rows(out, &rows)?;
        Ok(rows.len())
    }
}

/// Validation helpers for EOS parameters.
pub(crate) mod validation {
    use crate::error::{EosError, EosResult};
    use ns_core::ensure_positive;

    /// Ensure a parameter is positive and finite.
    pub fn validate_positive(v: f64, what: &'static str) -> EosResult<()> {
        ensure_positive(v, what)?;
        Ok(())
    }

    /// Ensure an adiabatic index is stiffer than dust.
    pub fn validate_gamma(gamma: f64) -> EosResult<()> {
        if !gamma.is_finite() || gamma <= 1.0 {
            return Err(EosError::OutOfRange {
                what: "gamma must be > 1",
                value: gamma,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;
    use crate::error::EosError;

    struct Linear;

    impl EquationOfState for Linear {
        fn name(&self) -> &str {
            "linear"
        }
        fn pressure(&self, density: f64, _x: f64) -> f64 {
            if density > 1.0 { f64::NAN } else { 100.0 * density }
        }
        fn d_pressure(&self, _density: f64, _x: f64) -> f64 {
            100.0
        }
        fn energy_density(&self, density: f64, _x: f64) -> f64 {
            939.0 * density
        }
        fn validity(&self) -> ValidityBounds {
            ValidityBounds {
                max_density: 2.0,
                max_energy: 1878.0,
                max_pressure: 200.0,
            }
        }
    }

    #[test]
    fn table_rows_skip_non_finite() {
        let eos = Linear;
        let grid_len = eos.table_grid().len();
        let rows = eos.table_rows();
        assert!(!rows.is_empty());
        assert!(rows.len() < grid_len);
        assert!(rows.iter().all(|r| r.density <= 1.0));
        assert!(rows.windows(2).all(|w| w[0].density < w[1].density));
    }

    #[test]
    fn vectorized_queries_match_scalar() {
        let eos = Linear;
        let ns = [0.1, 0.2, 0.3];
        let ps = eos.pressures(&ns, 0.0);
        for (n, p) in ns.iter().zip(ps) {
            assert_eq!(p, eos.pressure(*n, 0.0));
        }
        assert_eq!(eos.saturation_density(), 0.16);
    }

    #[test]
    fn validate_parameters() {
        assert!(validate_positive(1.0, "k").is_ok());
        assert!(matches!(
            validate_positive(0.0, "k"),
            Err(EosError::OutOfRange { what: "k", .. })
        ));
        assert!(matches!(
            validate_positive(f64::NAN, "k"),
            Err(EosError::NonPhysical { what: "k" })
        ));
        assert!(validate_gamma(2.0).is_ok());
        assert!(validate_gamma(1.0).is_err());
    }
}
