//! Central-pressure searches: target mass and maximum mass.

use crate::error::{TidalError, WrapperResult};
use crate::result::TidalResult;
use crate::wrapper::TidalLoveWrapper;
use ns_solver::{MinimizeConfig, NewtonConfig, invert, minimize_bounded, secant};
use tracing::{debug, warn};

/// Search parameters.
#[derive(Clone, Copy, Debug)]
pub struct SearchConfig {
    /// Starting central pressure [MeV fm^-3]
    pub central_pressure0: f64,
    /// Target mass for [`TidalLoveWrapper::find_mass_with`] [M_sun]
    pub target_mass: f64,
    /// Max-mass restarts before giving up
    pub max_retries: usize,
    /// Lower edge of the max-mass interval [MeV fm^-3]
    pub lower_pressure: f64,
    /// Upper edge of the max-mass interval as a fraction of the max pressure
    pub upper_fraction: f64,
    /// Start used when `central_pressure0` exceeds the max pressure, as a fraction of it
    pub fallback_fraction: f64,
    pub root: NewtonConfig,
    pub minimize: MinimizeConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            central_pressure0: 10.0,
            target_mass: 1.4,
            max_retries: 16,
            lower_pressure: 0.01,
            upper_fraction: 0.95,
            fallback_fraction: 0.7,
            root: NewtonConfig::default(),
            minimize: MinimizeConfig::default(),
        }
    }
}

impl TidalLoveWrapper {
    /// Central pressure producing `mass` [M_sun], starting from `central_pressure0`.
    pub fn find_mass(&mut self, central_pressure0: f64, mass: f64) -> TidalResult {
        self.find_mass_with(&SearchConfig {
            central_pressure0,
            target_mass: mass,
            ..SearchConfig::default()
        })
    }

    /// Secant search on `calculate(pc).mass - target`. Never fails: a search
    /// that does not converge leaves `central_pressure` NaN.
    ///
    /// Mass, radius and checkpoints in the snapshot are those of the last
    /// trial integration, which the secant method does not repeat at the
    /// returned root.
    pub fn find_mass_with(&mut self, config: &SearchConfig) -> TidalResult {
        let pc0 = self.clamped_start(config);
        let target = config.target_mass;

        let pc = match secant(
            |pc| -> WrapperResult<f64> { Ok(self.calculate(pc)?.mass - target) },
            pc0,
            &config.root,
        ) {
            Ok(root) => root.x,
            Err(e) => {
                warn!(mass = target, error = %e, "Failed to find NS mass");
                f64::NAN
            }
        };

        let density = self.central_density(pc, 1.5 * self.eos.saturation_density(), &config.root);
        self.snapshot(pc, density)
    }

    /// Central pressure of the heaviest star below the EOS ceiling.
    pub fn find_max_mass(&mut self, central_pressure0: f64) -> WrapperResult<TidalResult> {
        self.find_max_mass_with(&SearchConfig {
            central_pressure0,
            ..SearchConfig::default()
        })
    }

    /// Bounded minimization of `-mass(pc)` on
    /// `[lower_pressure, upper_fraction * max_pressure]`.
    ///
    /// A failed minimization is restarted from twice the previous start until
    /// the start reaches the max pressure or `max_retries` attempts were made,
    /// then [`TidalError::SearchExhausted`] is returned.
    pub fn find_max_mass_with(&mut self, config: &SearchConfig) -> WrapperResult<TidalResult> {
        let mut pc0 = self.clamped_start(config);
        let max_pressure = self.bounds.max_pressure;
        let upper = config.upper_fraction * max_pressure;
        let mut attempts = 0;

        let pc = loop {
            if pc0.is_nan() || pc0 >= max_pressure || attempts >= config.max_retries {
                warn!(attempts, central_pressure0 = pc0, "Max mass search exhausted");
                return Err(TidalError::SearchExhausted {
                    attempts,
                    last_pressure: pc0,
                });
            }
            attempts += 1;

            match minimize_bounded(
                |pc| -> WrapperResult<f64> { Ok(-self.calculate(pc)?.mass) },
                config.lower_pressure,
                upper,
                pc0,
                &config.minimize,
            ) {
                Ok(min) => {
                    debug!(pc = min.x, mass = -min.fx, evaluations = min.evaluations, "Max mass found");
                    break min.x;
                }
                Err(e) => {
                    warn!(central_pressure0 = pc0, error = %e, "Failed to find max mass");
                    pc0 *= 2.0;
                }
            }
        };

        let density = self.central_density(pc, 5.0 * self.eos.saturation_density(), &config.root);
        Ok(self.snapshot(pc, density))
    }

    fn clamped_start(&self, config: &SearchConfig) -> f64 {
        let pc0 = config.central_pressure0;
        let max_pressure = self.bounds.max_pressure;
        if pc0 > max_pressure {
            let fallback = config.fallback_fraction * max_pressure;
            warn!(
                central_pressure0 = pc0,
                max_pressure, fallback, "Initial pressure exceeds max. valid pressure, ignoring it"
            );
            fallback
        } else {
            pc0
        }
    }

    /// Invert P(n) = pc; NaN when the inversion fails.
    fn central_density(&self, pc: f64, guess: f64, config: &NewtonConfig) -> f64 {
        let eos = self.eos.as_ref();
        let forward = |n: f64| eos.pressure(n, 0.0);
        let derivative = |n: f64| eos.d_pressure(n, 0.0);
        let inversion = invert(&forward, Some(&derivative), pc, guess, config);
        if !inversion.is_converged() {
            warn!(pc, "Cannot find central density");
        }
        inversion.or_sentinel(f64::NAN)
    }

    fn snapshot(&mut self, pc: f64, density: f64) -> TidalResult {
        self.working.central_pressure = pc;
        self.working.central_density = density;
        self.working.clone()
    }
}
