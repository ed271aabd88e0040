//! Centre-to-surface integration of a star and the integrator seam.

use crate::equations::{StarEquations, StructureState, tidal_deformability};
use crate::error::{StructureError, StructureResult};
use crate::integrator::{Integrator, RK4, StepConfig};
use crate::profile::StructureProfile;
use ns_core::{ensure_positive, solar_mass_km};
use ns_eos::{TabulatedEos, read_table};
use std::path::PathBuf;
use tracing::debug;

/// Relative slack on the central energy ceiling, covering table rounding.
const ENERGY_CEILING_SLACK: f64 = 1e-5;

/// Everything the integrator needs for one star.
#[derive(Clone, Debug)]
pub struct IntegrationRequest {
    /// EOS table in the whitespace format of `ns_eos::table`
    pub table_path: PathBuf,
    /// [MeV fm^-3]
    pub central_pressure: f64,
    /// Energy-density ceiling of the EOS [MeV fm^-3]
    pub max_energy: f64,
    /// Pressure that defines the stellar surface [MeV fm^-3]
    pub surface_pressure: f64,
    /// Pressures at which to record (mass, radius), descending
    pub checkpoints: Vec<f64>,
}

/// Integrated star. Checkpoint vectors follow the request order.
#[derive(Clone, Debug, PartialEq)]
pub struct IntegrationOutput {
    /// [M_sun]
    pub mass: f64,
    /// [km]
    pub radius: f64,
    /// Dimensionless tidal deformability
    pub lambda: f64,
    pub checkpoint_mass: Vec<f64>,
    pub checkpoint_radius: Vec<f64>,
}

/// The stellar-structure boundary.
///
/// A successful call with a non-positive mass is still a failed star; callers
/// check both.
pub trait StructureIntegrator: Send + Sync {
    fn integrate(&self, request: &IntegrationRequest) -> StructureResult<IntegrationOutput>;

    fn profile(&self, request: &IntegrationRequest) -> StructureResult<StructureProfile>;
}

/// RK4 integration of the TOV and tidal equations.
///
/// Reads the table file on every call, so the file is the only state shared
/// with the caller.
#[derive(Clone, Debug, Default)]
pub struct TovIntegrator {
    config: StepConfig,
}

struct March {
    output: IntegrationOutput,
    profile: Option<StructureProfile>,
}

impl TovIntegrator {
    pub fn new(config: StepConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    /// Integrate against an already loaded table.
    pub fn integrate_table(
        &self,
        table: &TabulatedEos,
        request: &IntegrationRequest,
    ) -> StructureResult<IntegrationOutput> {
        Ok(self.march(table, request, false)?.output)
    }

    fn load(&self, request: &IntegrationRequest) -> StructureResult<TabulatedEos> {
        let rows = read_table(&request.table_path)?;
        Ok(TabulatedEos::from_rows(&rows)?)
    }

    fn check_request(
        &self,
        equations: &StarEquations<'_>,
        request: &IntegrationRequest,
    ) -> StructureResult<()> {
        let pc = ensure_positive(request.central_pressure, "central pressure")?;
        let ps = ensure_positive(request.surface_pressure, "surface pressure")?;
        if ps < equations.table().min_pressure() {
            return Err(StructureError::OutOfRange {
                what: "surface pressure",
                value: ps,
            });
        }
        if pc <= ps || pc > equations.table().max_pressure() {
            return Err(StructureError::OutOfRange {
                what: "central pressure outside EOS table",
                value: pc,
            });
        }
        let ec = equations.energy_at(pc)?;
        if ec > request.max_energy * (1.0 + ENERGY_CEILING_SLACK) {
            return Err(StructureError::OutOfRange {
                what: "central energy density above EOS ceiling",
                value: ec,
            });
        }
        Ok(())
    }

    fn march(
        &self,
        table: &TabulatedEos,
        request: &IntegrationRequest,
        record_profile: bool,
    ) -> StructureResult<March> {
        let equations = StarEquations::new(table);
        self.check_request(&equations, request)?;

        let msun = solar_mass_km();
        let pc = request.central_pressure;
        let ps = request.surface_pressure;
        let x_center = pc.ln();
        let (mut x, mut state) = equations.center_state(pc, self.config.center_offset)?;
        let p_start = x.exp();

        let n = request.checkpoints.len();
        let mut checkpoint_mass = vec![f64::NAN; n];
        let mut checkpoint_radius = vec![f64::NAN; n];
        let mut targets: Vec<(Option<usize>, f64)> = Vec::with_capacity(n + 1);
        for (i, &p) in request.checkpoints.iter().enumerate() {
            if p >= pc {
                checkpoint_mass[i] = 0.0;
                checkpoint_radius[i] = 0.0;
            } else if p >= p_start {
                checkpoint_mass[i] = state[1] / msun;
                checkpoint_radius[i] = state[0];
            } else if p >= ps {
                targets.push((Some(i), p.ln()));
            }
        }
        targets.sort_by(|a, b| b.1.total_cmp(&a.1));
        targets.push((None, ps.ln()));

        let mut profile = record_profile.then(|| {
            let mut profile = StructureProfile::default();
            profile.push(0.0, 0.0, pc);
            profile.push(state[0], state[1] / msun, p_start);
            profile
        });

        let mut steps = 0usize;
        for (slot, x_target) in targets {
            while x > x_target {
                let (h, lands) = self.config.next_step(x_center, x, x_target);
                state = RK4.step(&equations, x, &state, h)?;
                x = if lands { x_target } else { x + h };

                if !state.iter().all(|v| v.is_finite()) {
                    return Err(StructureError::NonPhysical {
                        what: "non-finite structure state",
                        pressure: x.exp(),
                    });
                }
                steps += 1;
                if steps > self.config.max_steps {
                    return Err(StructureError::StepBudget {
                        max_steps: self.config.max_steps,
                        pressure: x.exp(),
                    });
                }
                if let Some(profile) = profile.as_mut() {
                    profile.push(state[0], state[1] / msun, x.exp());
                }
            }
            if let Some(i) = slot {
                checkpoint_mass[i] = state[1] / msun;
                checkpoint_radius[i] = state[0];
            }
        }

        let output = self.surface_output(&equations, &state, ps, checkpoint_mass, checkpoint_radius)?;
        debug!(
            pc,
            steps,
            mass = output.mass,
            radius = output.radius,
            lambda = output.lambda,
            "Star integrated"
        );
        Ok(March { output, profile })
    }

    fn surface_output(
        &self,
        equations: &StarEquations<'_>,
        state: &StructureState,
        surface_pressure: f64,
        checkpoint_mass: Vec<f64>,
        checkpoint_radius: Vec<f64>,
    ) -> StructureResult<IntegrationOutput> {
        let (radius, mass_km) = (state[0], state[1]);
        if !(mass_km > 0.0 && radius > 2.0 * mass_km) {
            return Err(StructureError::NonPhysical {
                what: "surface state",
                pressure: surface_pressure,
            });
        }
        let y = equations.surface_y(state, surface_pressure)?;
        let lambda = tidal_deformability(mass_km / radius, y);

        Ok(IntegrationOutput {
            mass: mass_km / solar_mass_km(),
            radius,
            lambda,
            checkpoint_mass,
            checkpoint_radius,
        })
    }
}

impl StructureIntegrator for TovIntegrator {
    fn integrate(&self, request: &IntegrationRequest) -> StructureResult<IntegrationOutput> {
        let table = self.load(request)?;
        self.integrate_table(&table, request)
    }

    fn profile(&self, request: &IntegrationRequest) -> StructureResult<StructureProfile> {
        let table = self.load(request)?;
        let march = self.march(&table, request, true)?;
        Ok(march.profile.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ns_eos::{EquationOfState, Polytrope};

    fn table() -> TabulatedEos {
        let eos = Polytrope::new(254.0, 2.0, 2.0).unwrap();
        TabulatedEos::from_rows(&eos.table_rows()).unwrap()
    }

    fn request(pc: f64, checkpoints: Vec<f64>) -> IntegrationRequest {
        let eos = Polytrope::new(254.0, 2.0, 2.0).unwrap();
        IntegrationRequest {
            table_path: PathBuf::new(),
            central_pressure: pc,
            max_energy: eos.validity().max_energy,
            surface_pressure: 1e-8,
            checkpoints,
        }
    }

    #[test]
    fn canonical_star() {
        let out = TovIntegrator::default()
            .integrate_table(&table(), &request(57.0, vec![1e-8]))
            .unwrap();
        assert!(out.mass > 1.3 && out.mass < 1.5, "mass {}", out.mass);
        assert!(out.radius > 13.0 && out.radius < 15.5, "radius {}", out.radius);
        assert!(out.lambda > 50.0 && out.lambda < 2000.0, "lambda {}", out.lambda);
        // surface checkpoint is the star itself
        assert!((out.checkpoint_mass[0] - out.mass).abs() < 1e-12);
        assert!((out.checkpoint_radius[0] - out.radius).abs() < 1e-12);
    }

    #[test]
    fn checkpoint_edge_cases() {
        let out = TovIntegrator::default()
            .integrate_table(&table(), &request(20.0, vec![100.0, 5.0, 1e-9]))
            .unwrap();
        assert_eq!(out.checkpoint_mass[0], 0.0);
        assert_eq!(out.checkpoint_radius[0], 0.0);
        assert!(out.checkpoint_mass[1] > 0.0 && out.checkpoint_mass[1] < out.mass);
        assert!(out.checkpoint_radius[1] > 0.0 && out.checkpoint_radius[1] < out.radius);
        assert!(out.checkpoint_mass[2].is_nan());
        assert!(out.checkpoint_radius[2].is_nan());
    }

    #[test]
    fn invalid_central_pressures() {
        let integrator = TovIntegrator::default();
        let table = table();
        for pc in [0.0, -1.0, f64::NAN, 1e6] {
            let err = integrator.integrate_table(&table, &request(pc, vec![])).unwrap_err();
            assert!(matches!(err, StructureError::OutOfRange { .. }), "pc = {pc}");
        }
        let mut req = request(57.0, vec![]);
        req.surface_pressure = f64::NAN;
        let err = integrator.integrate_table(&table, &req).unwrap_err();
        assert!(matches!(
            err,
            StructureError::OutOfRange {
                what: "surface pressure",
                ..
            }
        ));
    }

    #[test]
    fn energy_ceiling_is_enforced() {
        let mut req = request(500.0, vec![]);
        req.max_energy = 100.0;
        let err = TovIntegrator::default()
            .integrate_table(&table(), &req)
            .unwrap_err();
        assert!(matches!(err, StructureError::OutOfRange { .. }));
    }

    #[test]
    fn step_budget_is_enforced() {
        let integrator = TovIntegrator::new(StepConfig {
            max_steps: 10,
            ..StepConfig::default()
        });
        let err = integrator
            .integrate_table(&table(), &request(57.0, vec![]))
            .unwrap_err();
        assert!(matches!(err, StructureError::StepBudget { max_steps: 10, .. }));
    }
}
