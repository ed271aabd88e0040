//! Content-based hashing for run IDs.

use crate::types::RunKind;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 over the serialized configuration, run kind and solver version.
pub fn compute_run_id<C: Serialize>(config: &C, run_kind: &RunKind, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let config_json = serde_json::to_string(config).unwrap_or_default();
    hasher.update(config_json.as_bytes());

    let run_kind_json = serde_json::to_string(run_kind).unwrap_or_default();
    hasher.update(run_kind_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Candidate {
        k: f64,
        gamma: f64,
    }

    #[test]
    fn hash_stability() {
        let config = Candidate { k: 254.0, gamma: 2.0 };
        let kind = RunKind::Batch {
            target_mass: 1.4,
            checkpoints: 0,
        };

        let hash1 = compute_run_id(&config, &kind, "v1");
        let hash2 = compute_run_id(&config, &kind, "v1");

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let soft = Candidate { k: 254.0, gamma: 2.0 };
        let stiff = Candidate { k: 254.0, gamma: 2.5 };
        let kind = RunKind::Batch {
            target_mass: 1.4,
            checkpoints: 2,
        };

        assert_ne!(compute_run_id(&soft, &kind, "v1"), compute_run_id(&stiff, &kind, "v1"));
        assert_ne!(
            compute_run_id(&soft, &kind, "v1"),
            compute_run_id(
                &soft,
                &RunKind::Batch {
                    target_mass: 1.2,
                    checkpoints: 2,
                },
                "v1"
            )
        );
        assert_ne!(compute_run_id(&soft, &kind, "v1"), compute_run_id(&soft, &kind, "v2"));
    }
}
