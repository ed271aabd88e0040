//! Pressure-indexed interpolation of an EOS table.

use crate::error::{EosError, EosResult};
use crate::table::EosTableRow;

/// EOS table re-indexed by pressure, interpolated linearly in log-log space.
///
/// Only rows with positive, finite pressure and energy density are kept, and
/// pressure must increase strictly from one kept row to the next; rows that
/// break monotonicity are dropped.
#[derive(Clone, Debug)]
pub struct TabulatedEos {
    ln_p: Vec<f64>,
    ln_e: Vec<f64>,
    ln_n: Vec<f64>,
}

impl TabulatedEos {
    pub fn from_rows(rows: &[EosTableRow]) -> EosResult<Self> {
        let mut ln_p = Vec::with_capacity(rows.len());
        let mut ln_e = Vec::with_capacity(rows.len());
        let mut ln_n = Vec::with_capacity(rows.len());

        for row in rows {
            let usable = row.pressure.is_finite()
                && row.pressure > 0.0
                && row.energy_density.is_finite()
                && row.energy_density > 0.0
                && row.density > 0.0;
            if !usable {
                continue;
            }
            let lp = row.pressure.ln();
            if ln_p.last().is_some_and(|&last| lp <= last) {
                continue;
            }
            ln_p.push(lp);
            ln_e.push(row.energy_density.ln());
            ln_n.push(row.density.ln());
        }

        if ln_p.len() < 2 {
            return Err(EosError::Table {
                line: 0,
                message: format!(
                    "need at least 2 rows with increasing positive pressure, found {}",
                    ln_p.len()
                ),
            });
        }

        Ok(Self { ln_p, ln_e, ln_n })
    }

    pub fn len(&self) -> usize {
        self.ln_p.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ln_p.is_empty()
    }

    pub fn min_pressure(&self) -> f64 {
        self.ln_p[0].exp()
    }

    pub fn max_pressure(&self) -> f64 {
        self.ln_p[self.ln_p.len() - 1].exp()
    }

    /// Energy density at pressure `p`, `None` outside the table.
    pub fn energy_at(&self, p: f64) -> Option<f64> {
        let (i, t) = self.locate(p)?;
        Some(lerp(self.ln_e[i], self.ln_e[i + 1], t).exp())
    }

    /// Baryon density at pressure `p`, `None` outside the table.
    pub fn density_at(&self, p: f64) -> Option<f64> {
        let (i, t) = self.locate(p)?;
        Some(lerp(self.ln_n[i], self.ln_n[i + 1], t).exp())
    }

    /// dε/dp at pressure `p` from the local log-log slope.
    pub fn de_dp_at(&self, p: f64) -> Option<f64> {
        let (i, t) = self.locate(p)?;
        let slope = (self.ln_e[i + 1] - self.ln_e[i]) / (self.ln_p[i + 1] - self.ln_p[i]);
        let e = lerp(self.ln_e[i], self.ln_e[i + 1], t).exp();
        Some(slope * e / p)
    }

    /// Segment index and fraction for `p`.
    fn locate(&self, p: f64) -> Option<(usize, f64)> {
        if !p.is_finite() || p <= 0.0 {
            return None;
        }
        let lp = p.ln();
        let last = self.ln_p.len() - 1;
        if lp < self.ln_p[0] || lp > self.ln_p[last] {
            return None;
        }
        let upper = self.ln_p.partition_point(|&v| v < lp).clamp(1, last);
        let i = upper - 1;
        let t = (lp - self.ln_p[i]) / (self.ln_p[upper] - self.ln_p[i]);
        Some((i, t))
    }
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
