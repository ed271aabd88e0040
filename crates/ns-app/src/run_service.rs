//! Batch execution and caching service.

use std::path::Path;
use std::time::Instant;

use ns_results::{CandidateRecord, RunKind, RunManifest, RunStore, compute_run_id};
use tracing::info;

use crate::batch::run_batch;
use crate::config::{self, RunConfig};
use crate::error::AppResult;
use crate::progress::{BatchProgressEvent, BatchStage, ProgressCallback};

/// Options for running a batch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Reuse a stored run with the same id instead of recomputing
    pub use_cache: bool,
    /// Persist the run to the store
    pub save: bool,
    pub solver_version: String,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            save: true,
            solver_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Request to execute a batch.
pub struct BatchRequest<'a> {
    pub config_path: &'a Path,
    pub options: BatchOptions,
}

/// Response from a batch execution.
#[derive(Debug, Clone)]
pub struct BatchResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub records: Vec<CandidateRecord>,
    pub loaded_from_cache: bool,
    pub elapsed_s: f64,
}

fn emit(
    progress: Option<ProgressCallback<'_>>,
    stage: BatchStage,
    started: Instant,
    total: usize,
    message: Option<String>,
) {
    if let Some(cb) = progress {
        let mut event = BatchProgressEvent::stage(stage, started.elapsed().as_secs_f64(), total);
        event.message = message;
        cb(event);
    }
}

fn store_for(config_path: &Path, config: &RunConfig) -> AppResult<RunStore> {
    let store = match &config.output_dir {
        Some(dir) if dir.is_absolute() => RunStore::new(dir.clone())?,
        Some(dir) => {
            let base = config_path.parent().unwrap_or_else(|| Path::new("."));
            RunStore::new(base.join(dir))?
        }
        None => RunStore::for_config(config_path)?,
    };
    Ok(store)
}

/// Run kind recorded for a configuration.
pub fn run_kind(config: &RunConfig) -> RunKind {
    RunKind::Batch {
        target_mass: config.search.target_mass,
        checkpoints: config.checkpoints.len(),
    }
}

/// Execute or load a batch.
pub fn ensure_batch(request: &BatchRequest) -> AppResult<BatchResponse> {
    ensure_batch_with_progress(request, None)
}

/// Execute or load a batch and stream progress events.
pub fn ensure_batch_with_progress(
    request: &BatchRequest,
    progress: Option<ProgressCallback<'_>>,
) -> AppResult<BatchResponse> {
    let started = Instant::now();
    let options = &request.options;

    emit(progress, BatchStage::LoadingConfig, started, 0, None);
    let config = config::load_yaml(request.config_path)?;
    let total = config.candidates.len();

    let kind = run_kind(&config);
    let run_id = compute_run_id(&config, &kind, &options.solver_version);

    let store = if options.use_cache || options.save {
        Some(store_for(request.config_path, &config)?)
    } else {
        None
    };

    if options.use_cache {
        emit(progress, BatchStage::CheckingCache, started, total, None);
        if let Some(store) = store.as_ref().filter(|s| s.has_run(&run_id)) {
            emit(progress, BatchStage::LoadingCachedResult, started, total, None);
            let manifest = store.load_manifest(&run_id)?;
            let records = store.load_records(&run_id)?;
            info!(run_id = %run_id, "Loaded cached run");
            emit(progress, BatchStage::Completed, started, total, None);
            return Ok(BatchResponse {
                run_id,
                manifest,
                records,
                loaded_from_cache: true,
                elapsed_s: started.elapsed().as_secs_f64(),
            });
        }
    }

    emit(progress, BatchStage::EvaluatingCandidates, started, total, None);
    let outcomes = run_batch(&config, progress);
    let records: Vec<CandidateRecord> = outcomes.iter().map(|o| o.to_record()).collect();

    let mut manifest = RunManifest::now(
        run_id.clone(),
        config.name.clone(),
        kind,
        options.solver_version.clone(),
    );
    manifest.candidates = records.len();
    manifest.accepted = records.iter().filter(|r| r.is_accepted()).count();

    if options.save {
        if let Some(store) = &store {
            emit(progress, BatchStage::SavingResults, started, total, None);
            store.save_run(&manifest, &records)?;
            info!(run_id = %run_id, dir = %store.root_dir().display(), "Run saved");
        }
    }

    emit(
        progress,
        BatchStage::Completed,
        started,
        total,
        Some(format!("{} of {} accepted", manifest.accepted, manifest.candidates)),
    );
    Ok(BatchResponse {
        run_id,
        manifest,
        records,
        loaded_from_cache: false,
        elapsed_s: started.elapsed().as_secs_f64(),
    })
}

/// Stored runs of a configuration, oldest first.
pub fn list_runs(config_path: &Path) -> AppResult<Vec<RunManifest>> {
    let config = config::load_yaml(config_path)?;
    let store = store_for(config_path, &config)?;
    Ok(store.list_runs(&config.name)?)
}

/// Load a stored run.
pub fn load_run(config_path: &Path, run_id: &str) -> AppResult<(RunManifest, Vec<CandidateRecord>)> {
    let config = config::load_yaml(config_path)?;
    let store = store_for(config_path, &config)?;
    let manifest = store.load_manifest(run_id)?;
    let records = store.load_records(run_id)?;
    Ok((manifest, records))
}
