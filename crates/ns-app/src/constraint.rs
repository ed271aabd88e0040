//! Pressure-band constraints on candidate EOSs.

use crate::config::ConstraintDef;
use ns_eos::EquationOfState;

/// Closed polygon in (n/n0, P) space. A candidate passes when more than
/// `accept_fraction` of the samples of its pressure curve over
/// `[x_min, x_max]` fall inside.
#[derive(Clone, Debug, PartialEq)]
pub struct PressureConstraint {
    pub name: String,
    pub polygon: Vec<(f64, f64)>,
    pub x_min: f64,
    pub x_max: f64,
    pub accept_fraction: f64,
    pub samples: usize,
}

impl PressureConstraint {
    pub const DEFAULT_SAMPLES: usize = 1000;

    pub fn from_def(def: &ConstraintDef) -> Self {
        Self {
            name: def.name.clone(),
            polygon: def.polygon.iter().map(|&[x, p]| (x, p)).collect(),
            x_min: def.x_min,
            x_max: def.x_max,
            accept_fraction: def.accept_fraction,
            samples: Self::DEFAULT_SAMPLES,
        }
    }

    /// Even-odd ray casting; points on an edge may fall either way.
    pub fn contains(&self, x: f64, p: f64) -> bool {
        if !(x.is_finite() && p.is_finite()) || self.polygon.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = self.polygon.len() - 1;
        for (i, &(xi, pi)) in self.polygon.iter().enumerate() {
            let (xj, pj) = self.polygon[j];
            if (pi > p) != (pj > p) && x < (xj - xi) * (p - pi) / (pj - pi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Share of the sampled pressure curve lying inside the polygon.
    pub fn inside_fraction<E: EquationOfState + ?Sized>(&self, eos: &E) -> f64 {
        let samples = self.samples.max(2);
        let n0 = eos.saturation_density();
        let step = (self.x_max - self.x_min) / (samples - 1) as f64;
        let inside = (0..samples)
            .map(|i| self.x_min + i as f64 * step)
            .filter(|&x| self.contains(x, eos.pressure(x * n0, 0.0)))
            .count();
        inside as f64 / samples as f64
    }

    pub fn accepts<E: EquationOfState + ?Sized>(&self, eos: &E) -> bool {
        self.inside_fraction(eos) > self.accept_fraction
    }
}
