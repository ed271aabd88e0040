//! Bounded scalar minimization (Brent's method).

use crate::error::SolverError;

/// Bounded minimizer configuration.
#[derive(Clone, Copy, Debug)]
pub struct MinimizeConfig {
    /// Maximum objective evaluations
    pub max_evaluations: usize,
    /// Absolute tolerance on the abscissa
    pub x_tol: f64,
}

impl Default for MinimizeConfig {
    fn default() -> Self {
        Self {
            max_evaluations: 500,
            x_tol: 1e-3,
        }
    }
}

/// Minimizer outcome.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimizeResult {
    pub x: f64,
    pub fx: f64,
    pub evaluations: usize,
}

/// Minimize `f` on `[lower, upper]` with Brent's parabolic/golden-section
/// method. The first trial point is `x0` clamped strictly inside the interval.
///
/// Errors from `f` abort the search and are returned unchanged.
pub fn minimize_bounded<F, E>(
    mut f: F,
    lower: f64,
    upper: f64,
    x0: f64,
    config: &MinimizeConfig,
) -> Result<MinimizeResult, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<SolverError>,
{
    if !(lower.is_finite() && upper.is_finite()) || lower >= upper {
        return Err(SolverError::ProblemSetup {
            what: format!("invalid bounds [{lower}, {upper}]"),
        }
        .into());
    }

    let sqrt_eps = f64::EPSILON.sqrt();
    let golden_mean = 0.5 * (3.0 - 5.0_f64.sqrt());

    let (mut a, mut b) = (lower, upper);
    let start = if x0.is_finite() {
        x0.clamp(lower + sqrt_eps * (upper - lower), upper - sqrt_eps * (upper - lower))
    } else {
        a + golden_mean * (b - a)
    };

    let mut fulc = start;
    let mut nfc = start;
    let mut xf = start;
    let mut rat: f64 = 0.0;
    let mut e: f64 = 0.0;

    let mut fx = evaluate(&mut f, xf)?;
    let mut evaluations = 1;
    let mut ffulc = fx;
    let mut fnfc = fx;

    let mut xm = 0.5 * (a + b);
    let mut tol1 = sqrt_eps * xf.abs() + config.x_tol / 3.0;
    let mut tol2 = 2.0 * tol1;

    while (xf - xm).abs() > tol2 - 0.5 * (b - a) {
        let mut golden = true;

        // Try a parabolic step through the three best points
        if e.abs() > tol1 {
            let mut r = (xf - nfc) * (fx - ffulc);
            let mut q = (xf - fulc) * (fx - fnfc);
            let mut p = (xf - fulc) * q - (xf - nfc) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            r = e;
            e = rat;

            if p.abs() < (0.5 * q * r).abs() && p > q * (a - xf) && p < q * (b - xf) {
                rat = p / q;
                let x = xf + rat;
                golden = false;
                if (x - a) < tol2 || (b - x) < tol2 {
                    rat = tol1 * sign_or_one(xm - xf);
                }
            }
        }

        if golden {
            e = if xf >= xm { a - xf } else { b - xf };
            rat = golden_mean * e;
        }

        let x = xf + sign_or_one(rat) * rat.abs().max(tol1);
        let fu = evaluate(&mut f, x)?;
        evaluations += 1;

        if fu <= fx {
            if x >= xf {
                a = xf;
            } else {
                b = xf;
            }
            fulc = nfc;
            ffulc = fnfc;
            nfc = xf;
            fnfc = fx;
            xf = x;
            fx = fu;
        } else {
            if x < xf {
                a = x;
            } else {
                b = x;
            }
            if fu <= fnfc || nfc == xf {
                fulc = nfc;
                ffulc = fnfc;
                nfc = x;
                fnfc = fu;
            } else if fu <= ffulc || fulc == xf || fulc == nfc {
                fulc = x;
                ffulc = fu;
            }
        }

        xm = 0.5 * (a + b);
        tol1 = sqrt_eps * xf.abs() + config.x_tol / 3.0;
        tol2 = 2.0 * tol1;

        if evaluations >= config.max_evaluations {
            return Err(SolverError::ConvergenceFailed {
                what: format!(
                    "Maximum evaluations {} reached, best x = {}",
                    config.max_evaluations, xf
                ),
            }
            .into());
        }
    }

    Ok(MinimizeResult {
        x: xf,
        fx,
        evaluations,
    })
}

fn evaluate<F, E>(f: &mut F, x: f64) -> Result<f64, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<SolverError>,
{
    let fx = f(x)?;
    if fx.is_nan() {
        return Err(SolverError::Numeric {
            what: format!("objective is NaN at x = {x}"),
        }
        .into());
    }
    Ok(fx)
}

#[inline]
fn sign_or_one(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}
