//! Scalar Newton and secant solvers, plus the inversion adapter.

use crate::error::{SolverError, SolverResult};
use tracing::debug;

/// Newton solver configuration.
#[derive(Clone, Copy, Debug)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance on the step
    pub x_tol: f64,
    /// Relative tolerance on the step
    pub rel_tol: f64,
    /// Early exit when |f| falls below this value (0 disables)
    pub f_tol: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            x_tol: 1.48e-8,
            rel_tol: 0.0,
            f_tol: 0.0,
        }
    }
}

impl NewtonConfig {
    fn step_converged(&self, x_new: f64, x_old: f64) -> bool {
        (x_new - x_old).abs() <= self.x_tol + self.rel_tol * x_new.abs()
    }

    fn residual_converged(&self, fx: f64) -> bool {
        fx == 0.0 || fx.abs() < self.f_tol
    }
}

/// Converged root.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewtonRoot {
    pub x: f64,
    /// Number of iterations
    pub iterations: usize,
}

fn finite<E: From<SolverError>>(v: f64, what: &str, x: f64) -> Result<f64, E> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SolverError::Numeric {
            what: format!("{what} is not finite at x = {x}"),
        }
        .into())
    }
}

/// Newton's method with an analytic derivative.
///
/// `f` may fail; its error aborts the search and is returned as is.
pub fn newton<F, D, E>(
    mut f: F,
    mut fprime: D,
    x0: f64,
    config: &NewtonConfig,
) -> Result<NewtonRoot, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    D: FnMut(f64) -> f64,
    E: From<SolverError>,
{
    let mut x = finite::<E>(x0, "initial guess", x0)?;

    for iter in 0..config.max_iterations {
        let fx = finite::<E>(f(x)?, "residual", x)?;
        if config.residual_converged(fx) {
            return Ok(NewtonRoot {
                x,
                iterations: iter,
            });
        }

        let dfx = finite::<E>(fprime(x), "derivative", x)?;
        if dfx == 0.0 {
            return Err(SolverError::Numeric {
                what: format!("derivative vanished at x = {x}"),
            }
            .into());
        }

        let x_new = x - fx / dfx;
        if config.step_converged(x_new, x) {
            return Ok(NewtonRoot {
                x: x_new,
                iterations: iter + 1,
            });
        }
        x = x_new;
    }

    Err(SolverError::ConvergenceFailed {
        what: format!(
            "Maximum iterations {} reached, last x = {}",
            config.max_iterations, x
        ),
    }
    .into())
}

/// Secant method; the second point is offset from `x0` by a relative 1e-4.
///
/// The returned root is the last extrapolated point, which is not itself
/// evaluated.
pub fn secant<F, E>(mut f: F, x0: f64, config: &NewtonConfig) -> Result<NewtonRoot, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<SolverError>,
{
    let eps = 1e-4;
    let mut p0 = finite::<E>(x0, "initial guess", x0)?;
    let mut p1 = p0 * (1.0 + eps);
    p1 += if p1 >= 0.0 { eps } else { -eps };

    let mut q0 = finite::<E>(f(p0)?, "residual", p0)?;
    if config.residual_converged(q0) {
        return Ok(NewtonRoot { x: p0, iterations: 0 });
    }
    let mut q1 = finite::<E>(f(p1)?, "residual", p1)?;
    if q1.abs() < q0.abs() {
        std::mem::swap(&mut p0, &mut p1);
        std::mem::swap(&mut q0, &mut q1);
    }

    for iter in 0..config.max_iterations {
        if config.residual_converged(q1) {
            return Ok(NewtonRoot {
                x: p1,
                iterations: iter,
            });
        }
        if q1 == q0 {
            if p1 != p0 {
                return Err(SolverError::Numeric {
                    what: format!("secant is flat between {p0} and {p1}"),
                }
                .into());
            }
            return Ok(NewtonRoot {
                x: 0.5 * (p0 + p1),
                iterations: iter,
            });
        }

        let p = if q1.abs() > q0.abs() {
            (-q0 / q1 * p1 + p0) / (1.0 - q0 / q1)
        } else {
            (-q1 / q0 * p0 + p1) / (1.0 - q1 / q0)
        };
        let p = finite::<E>(p, "secant step", p1)?;

        if config.step_converged(p, p1) {
            return Ok(NewtonRoot {
                x: p,
                iterations: iter + 1,
            });
        }

        p0 = p1;
        q0 = q1;
        p1 = p;
        q1 = finite::<E>(f(p1)?, "residual", p1)?;
    }

    Err(SolverError::ConvergenceFailed {
        what: format!(
            "Maximum iterations {} reached, last x = {}",
            config.max_iterations, p1
        ),
    }
    .into())
}

/// Outcome of inverting a monotonic map. Failure is a value, not an error.
#[derive(Clone, Debug, PartialEq)]
pub enum Inversion {
    Converged(f64),
    Failed(SolverError),
}

impl Inversion {
    pub fn value(&self) -> Option<f64> {
        match self {
            Inversion::Converged(x) => Some(*x),
            Inversion::Failed(_) => None,
        }
    }

    /// The converged value, or `sentinel` (0 or NaN depending on the caller).
    pub fn or_sentinel(&self, sentinel: f64) -> f64 {
        self.value().unwrap_or(sentinel)
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Inversion::Converged(_))
    }
}

/// Solve `forward(x) = target` starting from `x0`.
///
/// Uses Newton's method when `derivative` is given, the secant method
/// otherwise. Never fails: non-convergence comes back as
/// [`Inversion::Failed`].
pub fn invert(
    forward: &dyn Fn(f64) -> f64,
    derivative: Option<&dyn Fn(f64) -> f64>,
    target: f64,
    x0: f64,
    config: &NewtonConfig,
) -> Inversion {
    let residual = |x: f64| -> SolverResult<f64> { Ok(forward(x) - target) };
    let outcome = match derivative {
        Some(df) => newton(residual, df, x0, config),
        None => secant(residual, x0, config),
    };
    match outcome {
        Ok(root) if root.x.is_finite() => Inversion::Converged(root.x),
        Ok(root) => Inversion::Failed(SolverError::Numeric {
            what: format!("inversion produced {}", root.x),
        }),
        Err(e) => {
            debug!(target_value = target, x0, error = %e, "inversion failed");
            Inversion::Failed(e)
        }
    }
}

/// [`invert`] applied independently to every target.
pub fn invert_many(
    forward: &dyn Fn(f64) -> f64,
    derivative: Option<&dyn Fn(f64) -> f64>,
    targets: &[f64],
    x0: f64,
    config: &NewtonConfig,
) -> Vec<Inversion> {
    targets
        .iter()
        .map(|&target| invert(forward, derivative, target, x0, config))
        .collect()
}
