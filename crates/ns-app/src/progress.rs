//! Progress events streamed while a batch runs.

#[derive(Debug, Clone, PartialEq)]
pub enum BatchStage {
    LoadingConfig,
    CheckingCache,
    LoadingCachedResult,
    EvaluatingCandidates,
    SavingResults,
    Completed,
}

impl BatchStage {
    pub fn label(&self) -> &'static str {
        match self {
            BatchStage::LoadingConfig => "loading config",
            BatchStage::CheckingCache => "checking cache",
            BatchStage::LoadingCachedResult => "loading cached run",
            BatchStage::EvaluatingCandidates => "evaluating",
            BatchStage::SavingResults => "saving",
            BatchStage::Completed => "done",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchProgressEvent {
    pub stage: BatchStage,
    pub elapsed_wall_s: f64,
    /// Candidates finished so far
    pub completed: usize,
    pub total: usize,
    /// Set for per-candidate events
    pub candidate_id: Option<String>,
    pub message: Option<String>,
}

impl BatchProgressEvent {
    pub fn stage(stage: BatchStage, elapsed_wall_s: f64, total: usize) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            completed: 0,
            total,
            candidate_id: None,
            message: None,
        }
    }

    pub fn fraction_complete(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Callback shared by the worker threads.
pub type ProgressCallback<'a> = &'a (dyn Fn(BatchProgressEvent) + Sync);
