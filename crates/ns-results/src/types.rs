//! Result data types.

use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub config_name: String,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub run_kind: RunKind,
    pub solver_version: String,
    pub candidates: usize,
    /// Candidates that passed every constraint and produced stars
    pub accepted: usize,
}

impl RunManifest {
    /// Manifest stamped with the current UTC time.
    pub fn now(
        run_id: RunId,
        config_name: impl Into<String>,
        run_kind: RunKind,
        solver_version: impl Into<String>,
    ) -> Self {
        Self {
            run_id,
            config_name: config_name.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            run_kind,
            solver_version: solver_version.into(),
            candidates: 0,
            accepted: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RunKind {
    /// Constraint filter, max-mass and target-mass stars per candidate
    Batch { target_mass: f64, checkpoints: usize },
}

/// Outcome class of one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandidateStatus {
    Accepted,
    /// Failed a constraint; no stars computed
    Rejected { constraint: String },
    /// Evaluation failed; recorded as missing data
    NoData { reason: String },
}

/// One line of `results.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub candidate_id: String,
    #[serde(flatten)]
    pub status: CandidateStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    /// Named columns; `None` where the value was not computed
    #[serde(default)]
    pub values: Vec<ColumnValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnValue {
    pub name: String,
    pub value: Option<f64>,
}

impl ColumnValue {
    /// Non-finite values become `None`.
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: value.is_finite().then_some(value),
        }
    }
}

impl CandidateRecord {
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.iter().find(|c| c.name == name)?.value
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self.status, CandidateStatus::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_columns_are_missing() {
        let record = CandidateRecord {
            candidate_id: "c1".into(),
            status: CandidateStatus::Accepted,
            flags: vec![],
            values: vec![ColumnValue::new("Mass", 1.4), ColumnValue::new("R", f64::NAN)],
        };
        assert_eq!(record.value("Mass"), Some(1.4));
        assert_eq!(record.value("R"), None);
        assert_eq!(record.value("Lambda"), None);

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"status\":\"accepted\""));
        let back: CandidateRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn no_data_keeps_the_reason() {
        let record = CandidateRecord {
            candidate_id: "c2".into(),
            status: CandidateStatus::NoData {
                reason: "pc out of range".into(),
            },
            flags: vec!["violates_causality".into()],
            values: vec![],
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: CandidateRecord = serde_json::from_str(&json).unwrap();
        assert!(!back.is_accepted());
        assert_eq!(back, record);
    }
}
