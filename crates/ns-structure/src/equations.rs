//! TOV and tidal-perturbation equations in geometric units (km).
//!
//! The independent variable is x = ln P with P in MeV fm^-3. The state
//! carries radius r [km], enclosed mass m [km] and the tidal variable
//! y = r H'/H of the even-parity l = 2 perturbation.

use crate::error::{StructureError, StructureResult};
use crate::integrator::RadialModel;
use nalgebra::Vector3;
use ns_core::mev_fm3_to_km2;
use ns_eos::TabulatedEos;
use std::f64::consts::PI;

/// (r [km], m [km], y)
pub type StructureState = Vector3<f64>;

/// Right-hand side of the structure equations over one EOS table.
pub struct StarEquations<'a> {
    table: &'a TabulatedEos,
    to_geometric: f64,
}

impl<'a> StarEquations<'a> {
    pub fn new(table: &'a TabulatedEos) -> Self {
        Self {
            table,
            to_geometric: mev_fm3_to_km2(),
        }
    }

    pub fn table(&self) -> &TabulatedEos {
        self.table
    }

    /// Energy density at `p`, both in MeV fm^-3.
    pub fn energy_at(&self, p: f64) -> StructureResult<f64> {
        self.table.energy_at(p).ok_or(StructureError::OutOfRange {
            what: "pressure outside EOS table",
            value: p,
        })
    }

    /// Series expansion about the centre, evaluated at P = pc (1 - offset).
    ///
    /// Returns the starting x = ln P and state.
    pub fn center_state(&self, pc: f64, offset: f64) -> StructureResult<(f64, StructureState)> {
        let ec = self.energy_at(pc)? * self.to_geometric;
        let pcg = pc * self.to_geometric;

        let r = (offset * pcg / (2.0 * PI * (ec + pcg) * (ec / 3.0 + pcg))).sqrt();
        let m = 4.0 / 3.0 * PI * r.powi(3) * ec;
        if !r.is_finite() || r <= 0.0 {
            return Err(StructureError::NonPhysical {
                what: "central expansion",
                pressure: pc,
            });
        }

        Ok(((pc * (1.0 - offset)).ln(), StructureState::new(r, m, 2.0)))
    }

    /// Surface value of y corrected for a density discontinuity at P = `p_surface`.
    pub fn surface_y(&self, state: &StructureState, p_surface: f64) -> StructureResult<f64> {
        let (r, m, y) = (state[0], state[1], state[2]);
        let es = self.energy_at(p_surface)? * self.to_geometric;
        Ok(y - 4.0 * PI * r.powi(3) * es / m)
    }
}

impl RadialModel for StarEquations<'_> {
    fn rhs(&self, x: f64, state: &StructureState) -> StructureResult<StructureState> {
        let p = x.exp();
        let e = self.energy_at(p)?;
        let de_dp = self.table.de_dp_at(p).ok_or(StructureError::OutOfRange {
            what: "pressure outside EOS table",
            value: p,
        })?;

        let (r, m, y) = (state[0], state[1], state[2]);
        if !(r > 2.0 * m) || m < 0.0 {
            return Err(StructureError::NonPhysical {
                what: "trapped surface",
                pressure: p,
            });
        }

        let pg = p * self.to_geometric;
        let eg = e * self.to_geometric;
        let r2 = r * r;
        let metric = 1.0 - 2.0 * m / r;
        let source = m + 4.0 * PI * r2 * r * pg;

        let dp_dr = -(eg + pg) * source / (r * (r - 2.0 * m));
        let dr_dx = pg / dp_dr;
        let dm_dx = 4.0 * PI * r2 * eg * dr_dx;

        let f = (1.0 - 4.0 * PI * r2 * (eg - pg)) / metric;
        let q = 4.0 * PI / metric * (5.0 * eg + 9.0 * pg + (eg + pg) * de_dp)
            - 6.0 / (r2 * metric)
            - 4.0 * (source / (r2 * metric)).powi(2);
        let dy_dr = -(y * y + y * f + r2 * q) / r;

        Ok(StructureState::new(dr_dx, dm_dx, dy_dr * dr_dx))
    }
}

/// Quadrupolar Love number k2 from compactness C = M/R and surface y.
pub fn love_number(compactness: f64, y: f64) -> f64 {
    let c = compactness;
    let c2 = c * c;
    let one_minus = 1.0 - 2.0 * c;

    let numerator = 8.0 / 5.0 * c.powi(5) * one_minus.powi(2) * (2.0 + 2.0 * c * (y - 1.0) - y);
    let denominator = 2.0 * c * (6.0 - 3.0 * y + 3.0 * c * (5.0 * y - 8.0))
        + 4.0 * c.powi(3) * (13.0 - 11.0 * y + c * (3.0 * y - 2.0) + 2.0 * c2 * (1.0 + y))
        + 3.0 * one_minus.powi(2) * (2.0 - y + 2.0 * c * (y - 1.0)) * one_minus.ln();

    numerator / denominator
}

/// Dimensionless tidal deformability Λ = (2/3) k2 C^-5.
pub fn tidal_deformability(compactness: f64, y: f64) -> f64 {
    2.0 / 3.0 * love_number(compactness, y) / compactness.powi(5)
}
