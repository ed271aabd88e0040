use std::fs;

use ns_results::{
    CandidateRecord, CandidateStatus, ColumnValue, ResultsError, RunKind, RunManifest, RunStore,
    compute_run_id,
};

fn records() -> Vec<CandidateRecord> {
    vec![
        CandidateRecord {
            candidate_id: "soft".to_string(),
            status: CandidateStatus::Accepted,
            flags: vec![],
            values: vec![ColumnValue::new("Mass", 1.4), ColumnValue::new("R", 14.1)],
        },
        CandidateRecord {
            candidate_id: "broken".to_string(),
            status: CandidateStatus::NoData {
                reason: "physical range".to_string(),
            },
            flags: vec![],
            values: vec![ColumnValue::new("Mass", f64::NAN)],
        },
    ]
}

#[test]
fn save_list_load_roundtrip() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let config_path = dir.path().join("sweep.yaml");
    fs::write(&config_path, "version: 1\nname: sweep\n").expect("failed to write config");

    let store = RunStore::for_config(&config_path).expect("failed to create run store");
    assert!(store.root_dir().ends_with(".nstidal/runs"));

    let kind = RunKind::Batch {
        target_mass: 1.4,
        checkpoints: 0,
    };
    let run_id = compute_run_id(&"sweep", &kind, "0.1.0");
    let mut manifest = RunManifest::now(run_id.clone(), "sweep", kind, "0.1.0");
    manifest.candidates = 2;
    manifest.accepted = 1;

    store
        .save_run(&manifest, &records())
        .expect("failed to save run");
    assert!(store.has_run(&run_id));

    let runs = store.list_runs("sweep").expect("failed to list runs");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run_id, run_id);
    assert!(store.list_runs("other").unwrap().is_empty());

    let loaded_manifest = store.load_manifest(&run_id).expect("failed to load manifest");
    assert_eq!(loaded_manifest.accepted, 1);
    assert!(chrono::DateTime::parse_from_rfc3339(&loaded_manifest.timestamp).is_ok());

    let loaded = store.load_records(&run_id).expect("failed to load records");
    assert_eq!(loaded, records());
    assert_eq!(loaded[1].value("Mass"), None);

    store.delete_run(&run_id).unwrap();
    assert!(!store.has_run(&run_id));
    assert!(matches!(
        store.load_manifest(&run_id),
        Err(ResultsError::RunNotFound { .. })
    ));
}

