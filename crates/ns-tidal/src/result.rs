//! Outcome of one star evaluation.

use serde::{Deserialize, Serialize};

/// Mass, radius and tidal response of one star. NaN marks "not computed".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TidalResult {
    /// [M_sun]
    pub mass: f64,
    /// [MeV fm^-3]
    pub central_pressure: f64,
    /// [fm^-3]
    pub central_density: f64,
    /// [km]
    pub radius: f64,
    pub lambda: f64,
    pub checkpoint_mass: Vec<f64>,
    pub checkpoint_radius: Vec<f64>,
    pub checkpoint_density: Vec<f64>,
}

impl TidalResult {
    /// Fresh result with `num_checkpoints` empty checkpoint slots.
    pub fn new(num_checkpoints: usize) -> Self {
        Self {
            mass: f64::NAN,
            central_pressure: f64::NAN,
            central_density: f64::NAN,
            radius: f64::NAN,
            lambda: f64::NAN,
            checkpoint_mass: vec![f64::NAN; num_checkpoints],
            checkpoint_radius: vec![f64::NAN; num_checkpoints],
            checkpoint_density: vec![f64::NAN; num_checkpoints],
        }
    }

    /// True when no star was computed.
    pub fn is_nan(&self) -> bool {
        self.mass.is_nan()
    }

    pub fn num_checkpoints(&self) -> usize {
        self.checkpoint_mass.len()
    }

    /// Flat record for report tables, in column order.
    pub fn to_record(&self) -> Vec<(String, f64)> {
        let mut record = vec![
            ("Mass".to_string(), self.mass),
            ("PCentral".to_string(), self.central_pressure),
            ("DensCentral".to_string(), self.central_density),
            ("R".to_string(), self.radius),
            ("Lambda".to_string(), self.lambda),
        ];
        for (i, ((m, r), n)) in self
            .checkpoint_mass
            .iter()
            .zip(&self.checkpoint_radius)
            .zip(&self.checkpoint_density)
            .enumerate()
        {
            record.push((format!("RadiusCheckpoint{i}"), *r));
            record.push((format!("MassCheckpoint{i}"), *m));
            record.push((format!("DensityCheckpoint{i}"), *n));
        }
        record
    }
}

impl Default for TidalResult {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_result_is_nan() {
        let result = TidalResult::new(3);
        assert!(result.is_nan());
        assert_eq!(result.num_checkpoints(), 3);
        assert!(result.checkpoint_density.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn record_keys_in_order() {
        let mut result = TidalResult::new(2);
        result.mass = 1.4;
        result.checkpoint_radius[1] = 11.0;
        let record = result.to_record();
        let keys: Vec<&str> = record.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            [
                "Mass",
                "PCentral",
                "DensCentral",
                "R",
                "Lambda",
                "RadiusCheckpoint0",
                "MassCheckpoint0",
                "DensityCheckpoint0",
                "RadiusCheckpoint1",
                "MassCheckpoint1",
                "DensityCheckpoint1",
            ]
        );
        assert_eq!(record[0].1, 1.4);
        assert_eq!(record[8].1, 11.0);
    }

    #[test]
    fn serializes_to_json() {
        let mut result = TidalResult::new(1);
        result.mass = 1.4;
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"mass\":1.4"));
        // NaN has no JSON form
        assert!(json.contains("\"radius\":null"));
    }
}
