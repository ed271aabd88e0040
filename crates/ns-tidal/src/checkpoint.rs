//! Checkpoint schedules: where the integrator reports intermediate (M, R).

use ns_core::sorted_descending;
use ns_eos::EquationOfState;
use ns_solver::{NewtonConfig, invert_many};
use tracing::debug;

/// Immutable pair of checkpoint views, pressures and densities.
///
/// Pressures are always strictly descending. Densities follow the pressures
/// one to one; a pressure that could not be inverted carries density 0.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckpointSchedule {
    pressures: Vec<f64>,
    densities: Vec<f64>,
    names: Vec<String>,
}

impl CheckpointSchedule {
    /// Single checkpoint at the stellar surface.
    pub fn surface<E: EquationOfState + ?Sized>(eos: &E, pressure: f64) -> Self {
        Self::from_pressures(eos, &[pressure])
    }

    /// Pressure-specified checkpoints; densities come from inverting the EOS
    /// from its saturation density with dP/dn as the Newton derivative.
    pub fn from_pressures<E: EquationOfState + ?Sized>(eos: &E, pressures: &[f64]) -> Self {
        let pressures: Vec<f64> = sorted_descending(pressures)
            .into_iter()
            .filter(|p| p.is_finite())
            .collect();

        let forward = |n: f64| eos.pressure(n, 0.0);
        let derivative = |n: f64| eos.d_pressure(n, 0.0);
        let inversions = invert_many(
            &forward,
            Some(&derivative),
            &pressures,
            eos.saturation_density(),
            &NewtonConfig::default(),
        );
        let failed = inversions.iter().filter(|i| !i.is_converged()).count();
        if failed > 0 {
            debug!(failed, eos = eos.name(), "Checkpoint densities set to 0");
        }

        Self {
            densities: inversions.iter().map(|i| i.or_sentinel(0.0)).collect(),
            pressures,
            names: Vec::new(),
        }
    }

    /// Density-specified checkpoints, mapped forward through the EOS (exact).
    ///
    /// Densities that map to the same pressure collapse into one checkpoint,
    /// so the schedule can be shorter than `densities`.
    pub fn from_densities<E: EquationOfState + ?Sized>(eos: &E, densities: &[f64]) -> Self {
        let mut pairs: Vec<(f64, f64)> = densities
            .iter()
            .filter(|n| n.is_finite())
            .map(|&n| (eos.pressure(n, 0.0), n))
            .filter(|(p, _)| p.is_finite())
            .collect();
        pairs.sort_by(|a, b| b.0.total_cmp(&a.0));
        pairs.dedup_by(|a, b| a.0 == b.0);

        Self {
            pressures: pairs.iter().map(|&(p, _)| p).collect(),
            densities: pairs.iter().map(|&(_, n)| n).collect(),
            names: Vec::new(),
        }
    }

    /// Like [`CheckpointSchedule::from_densities`], keeping a label per density.
    /// Of two entries with the same density the first label is kept.
    pub fn from_named_densities<E, S>(eos: &E, named: &[(S, f64)]) -> Self
    where
        E: EquationOfState + ?Sized,
        S: AsRef<str>,
    {
        let mut entries: Vec<(f64, f64, &str)> = named
            .iter()
            .filter(|(_, n)| n.is_finite())
            .map(|(name, n)| (eos.pressure(*n, 0.0), *n, name.as_ref()))
            .filter(|(p, _, _)| p.is_finite())
            .collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries.dedup_by(|a, b| a.1 == b.1);

        Self {
            pressures: entries.iter().map(|e| e.0).collect(),
            densities: entries.iter().map(|e| e.1).collect(),
            names: entries.iter().map(|e| e.2.to_string()).collect(),
        }
    }

    pub fn pressures(&self) -> &[f64] {
        &self.pressures
    }

    pub fn densities(&self) -> &[f64] {
        &self.densities
    }

    /// Labels, empty unless built from named densities.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// (label, density) pairs, densest first.
    pub fn named(&self) -> Vec<(String, f64)> {
        self.names
            .iter()
            .cloned()
            .zip(self.densities.iter().copied())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pressures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressures.is_empty()
    }
}
