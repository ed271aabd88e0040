//! The EOS-bound stellar-structure wrapper.

use crate::checkpoint::CheckpointSchedule;
use crate::error::{TidalError, WrapperResult};
use crate::result::TidalResult;
use crate::table_file::TableFile;
use ns_eos::{EquationOfState, ValidityBounds};
use ns_structure::{
    IntegrationRequest, StructureError, StructureIntegrator, StructureProfile, TovIntegrator,
};
use std::path::Path;
use tracing::debug;

/// Pressure that defines the stellar surface [MeV fm^-3].
pub const DEFAULT_SURFACE_PRESSURE: f64 = 1e-8;

/// Binds one EOS to a stellar-structure integrator.
///
/// The EOS table is written once at construction and read by every
/// [`TidalLoveWrapper::calculate`]. Validity bounds are captured at the same
/// time. Evaluation takes `&mut self`; one wrapper serves one thread.
pub struct TidalLoveWrapper {
    pub(crate) eos: Box<dyn EquationOfState>,
    integrator: Box<dyn StructureIntegrator>,
    table: TableFile,
    pub(crate) bounds: ValidityBounds,
    surface_pressure: f64,
    schedule: CheckpointSchedule,
    pub(crate) working: TidalResult,
}

impl std::fmt::Debug for TidalLoveWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TidalLoveWrapper")
            .field("eos", &self.eos.name())
            .field("table", &self.table.path())
            .field("bounds", &self.bounds)
            .field("checkpoints", &self.schedule.len())
            .finish()
    }
}

impl TidalLoveWrapper {
    /// Wrapper with the default [`TovIntegrator`] and a temporary table file.
    pub fn new(eos: impl EquationOfState + 'static) -> WrapperResult<Self> {
        Self::with_integrator(eos, TovIntegrator::default())
    }

    pub fn with_integrator(
        eos: impl EquationOfState + 'static,
        integrator: impl StructureIntegrator + 'static,
    ) -> WrapperResult<Self> {
        let table = TableFile::temporary(&eos)?;
        Ok(Self::assemble(Box::new(eos), Box::new(integrator), table))
    }

    /// Write the table to `path` instead of a temporary file; the file is kept.
    pub fn with_table_path(
        eos: impl EquationOfState + 'static,
        integrator: impl StructureIntegrator + 'static,
        path: impl AsRef<Path>,
    ) -> WrapperResult<Self> {
        let table = TableFile::named(&eos, path.as_ref())?;
        Ok(Self::assemble(Box::new(eos), Box::new(integrator), table))
    }

    fn assemble(
        eos: Box<dyn EquationOfState>,
        integrator: Box<dyn StructureIntegrator>,
        table: TableFile,
    ) -> Self {
        let bounds = eos.validity();
        debug!(
            eos = eos.name(),
            max_energy = bounds.max_energy,
            max_pressure = bounds.max_pressure,
            "EOS validity captured"
        );
        let schedule = CheckpointSchedule::surface(eos.as_ref(), DEFAULT_SURFACE_PRESSURE);
        Self {
            eos,
            integrator,
            table,
            bounds,
            surface_pressure: DEFAULT_SURFACE_PRESSURE,
            working: TidalResult::new(schedule.len()),
            schedule,
        }
    }

    pub fn eos(&self) -> &dyn EquationOfState {
        self.eos.as_ref()
    }

    pub fn max_energy(&self) -> f64 {
        self.bounds.max_energy
    }

    pub fn max_pressure(&self) -> f64 {
        self.bounds.max_pressure
    }

    pub fn surface_pressure(&self) -> f64 {
        self.surface_pressure
    }

    pub fn table_path(&self) -> &Path {
        self.table.path()
    }

    /// Result of the most recent evaluation.
    pub fn result(&self) -> &TidalResult {
        &self.working
    }

    // ---- checkpoints ----

    pub fn checkpoints(&self) -> &CheckpointSchedule {
        &self.schedule
    }

    pub fn checkpoint_pressures(&self) -> &[f64] {
        self.schedule.pressures()
    }

    pub fn density_checkpoints(&self) -> &[f64] {
        self.schedule.densities()
    }

    pub fn named_density_checkpoints(&self) -> Vec<(String, f64)> {
        self.schedule.named()
    }

    pub fn set_checkpoints(&mut self, schedule: CheckpointSchedule) {
        self.schedule = schedule;
    }

    pub fn set_checkpoint_by_pressure(&mut self, pressures: &[f64]) {
        self.schedule = CheckpointSchedule::from_pressures(self.eos.as_ref(), pressures);
    }

    /// Repeated densities collapse into one checkpoint; results carry one
    /// column per distinct density.
    pub fn set_checkpoint_by_density(&mut self, densities: &[f64]) {
        self.schedule = CheckpointSchedule::from_densities(self.eos.as_ref(), densities);
    }

    pub fn set_named_checkpoint_by_density<S: AsRef<str>>(&mut self, named: &[(S, f64)]) {
        self.schedule = CheckpointSchedule::from_named_densities(self.eos.as_ref(), named);
    }

    // ---- evaluation ----

    fn request(&self, central_pressure: f64) -> IntegrationRequest {
        IntegrationRequest {
            table_path: self.table.path().to_path_buf(),
            central_pressure,
            max_energy: self.bounds.max_energy,
            surface_pressure: self.surface_pressure,
            checkpoints: self.schedule.pressures().to_vec(),
        }
    }

    fn physical_range(&self, pc: f64, cause: Option<StructureError>) -> TidalError {
        TidalError::PhysicalRange {
            pc,
            max_pressure: self.bounds.max_pressure,
            cause,
        }
    }

    /// Integrate one star with central pressure `pc` [MeV fm^-3].
    ///
    /// Any integrator failure, or a non-positive mass, is a
    /// [`TidalError::PhysicalRange`].
    pub fn calculate(&mut self, pc: f64) -> WrapperResult<TidalResult> {
        let mut result = TidalResult::new(self.schedule.len());
        self.working = result.clone();

        let output = match self.integrator.integrate(&self.request(pc)) {
            Ok(output) if output.mass > 0.0 => output,
            Ok(output) => {
                debug!(pc, mass = output.mass, "Integrator returned a non-positive mass");
                return Err(self.physical_range(pc, None));
            }
            Err(e) => {
                debug!(pc, error = %e, "Integration failed");
                return Err(self.physical_range(pc, Some(e)));
            }
        };

        result.mass = output.mass;
        result.central_pressure = pc;
        result.radius = output.radius;
        result.lambda = output.lambda;
        result.checkpoint_mass = output.checkpoint_mass;
        result.checkpoint_radius = output.checkpoint_radius;
        result.checkpoint_density = self.schedule.densities().to_vec();

        self.working = result.clone();
        Ok(result)
    }

    /// Radial trace of the star at `pc`, centre to surface.
    pub fn profile(&self, pc: f64) -> WrapperResult<StructureProfile> {
        self.integrator
            .profile(&self.request(pc))
            .map_err(|e| self.physical_range(pc, Some(e)))
    }

    /// Release the table file.
    pub fn close(self) -> WrapperResult<()> {
        self.table.close()
    }
}
