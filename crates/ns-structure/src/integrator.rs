//! Fixed-step integrators in the log-pressure variable.

use crate::equations::StructureState;
use crate::error::StructureResult;

/// A system of radial ODEs with x = ln P as the independent variable.
pub trait RadialModel {
    /// Compute d(state)/dx at (x, state).
    fn rhs(&self, x: f64, state: &StructureState) -> StructureResult<StructureState>;
}

/// Trait for single-step integrators.
pub trait Integrator {
    /// Advance the state from x to x + h.
    fn step<M: RadialModel>(
        &self,
        model: &M,
        x: f64,
        state: &StructureState,
        h: f64,
    ) -> StructureResult<StructureState>;
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Debug)]
pub struct RK4;

impl Integrator for RK4 {
    fn step<M: RadialModel>(
        &self,
        model: &M,
        x: f64,
        state: &StructureState,
        h: f64,
    ) -> StructureResult<StructureState> {
        let k1 = model.rhs(x, state)?;
        let k2 = model.rhs(x + 0.5 * h, &(state + k1 * (0.5 * h)))?;
        let k3 = model.rhs(x + 0.5 * h, &(state + k2 * (0.5 * h)))?;
        let k4 = model.rhs(x + h, &(state + k3 * h))?;

        // state_new = state + (h/6) * (k1 + 2*k2 + 2*k3 + k4)
        Ok(state + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0))
    }
}

/// Step-size control for the outward march.
#[derive(Clone, Copy, Debug)]
pub struct StepConfig {
    /// Largest |h| in ln P
    pub max_step: f64,
    /// |h| never exceeds this fraction of the distance to the centre, which
    /// gives geometric growth of the step away from the centre
    pub growth_fraction: f64,
    /// Relative pressure drop at which the central series expansion is evaluated
    pub center_offset: f64,
    /// Hard cap on the number of steps per star
    pub max_steps: usize,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            max_step: 0.02,
            growth_fraction: 0.25,
            center_offset: 1e-4,
            max_steps: 200_000,
        }
    }
}

impl StepConfig {
    /// Signed step from `x` towards `x_target` (< x), ending exactly on the target.
    ///
    /// Returns `(h, lands)`, where `lands` is true when the step was clipped.
    pub fn next_step(&self, x_center: f64, x: f64, x_target: f64) -> (f64, bool) {
        let h = self.max_step.min(self.growth_fraction * (x_center - x));
        if x - h <= x_target {
            (x_target - x, true)
        } else {
            (-h, false)
        }
    }
}
