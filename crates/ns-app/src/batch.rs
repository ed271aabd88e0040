//! Parallel sweep over the candidates of a run configuration.

use crate::config::{CandidateDef, RunConfig};
use crate::constraint::PressureConstraint;
use crate::progress::{BatchProgressEvent, BatchStage, ProgressCallback};
use ns_eos::{EquationOfState, SoundSpeedScan, scan_sound_speed};
use ns_results::{CandidateRecord, CandidateStatus, ColumnValue};
use ns_tidal::{SearchConfig, TidalLoveWrapper, TidalResult};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

pub const FLAG_VIOLATES_CAUSALITY: &str = "violates_causality";
pub const FLAG_NEGATIVE_SOUND: &str = "negative_sound";
pub const FLAG_BELOW_TARGET_MASS: &str = "below_target_mass";
pub const FLAG_MASS_SEARCH_FAILED: &str = "mass_search_failed";

/// Sound speed is scanned from this fraction of saturation density up to the
/// centre of the heaviest star.
const SOUND_SCAN_START: f64 = 0.1;
const SOUND_SCAN_SAMPLES: usize = 200;

/// Everything computed for one candidate.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateOutcome {
    pub candidate_id: String,
    pub status: CandidateStatus,
    pub flags: Vec<String>,
    /// Star at the target mass
    pub star: Option<TidalResult>,
    pub max_mass: Option<TidalResult>,
    pub sound: Option<SoundSpeedScan>,
}

impl CandidateOutcome {
    /// Failed evaluation, recorded as missing data.
    pub fn no_data(candidate_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::bare(
            candidate_id.into(),
            CandidateStatus::NoData {
                reason: reason.into(),
            },
        )
    }

    pub fn rejected(candidate_id: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::bare(
            candidate_id.into(),
            CandidateStatus::Rejected {
                constraint: constraint.into(),
            },
        )
    }

    fn bare(candidate_id: String, status: CandidateStatus) -> Self {
        Self {
            candidate_id,
            status,
            flags: Vec::new(),
            star: None,
            max_mass: None,
            sound: None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self.status, CandidateStatus::Accepted)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// Report row: target-mass star columns, then the heaviest star and the
    /// sound-speed extremes.
    pub fn to_record(&self) -> CandidateRecord {
        let mut values = Vec::new();
        if let Some(star) = &self.star {
            values.extend(
                star.to_record()
                    .into_iter()
                    .map(|(name, value)| ColumnValue::new(name, value)),
            );
        }
        if let Some(max) = &self.max_mass {
            values.push(ColumnValue::new("MaxMass", max.mass));
            values.push(ColumnValue::new("PCentralMaxMass", max.central_pressure));
            values.push(ColumnValue::new("DensCentralMaxMass", max.central_density));
            values.push(ColumnValue::new("RMaxMass", max.radius));
        }
        if let Some(sound) = &self.sound {
            values.push(ColumnValue::new("MaxSoundSpeed2", sound.max_cs2));
            values.push(ColumnValue::new("MinSoundSpeed2", sound.min_cs2));
        }
        CandidateRecord {
            candidate_id: self.candidate_id.clone(),
            status: self.status.clone(),
            flags: self.flags.clone(),
            values,
        }
    }
}

/// Flags raised by a sound-speed scan.
pub fn sound_flags(scan: &SoundSpeedScan) -> Vec<String> {
    let mut flags = Vec::new();
    if scan.violates_causality() {
        flags.push(FLAG_VIOLATES_CAUSALITY.to_string());
    }
    if scan.negative_sound() {
        flags.push(FLAG_NEGATIVE_SOUND.to_string());
    }
    flags
}

/// Evaluate one candidate. Never fails: problems end up in the outcome's
/// status or flags.
pub fn evaluate_candidate(
    candidate: &CandidateDef,
    config: &RunConfig,
    constraints: &[PressureConstraint],
) -> CandidateOutcome {
    let id = candidate.id.as_str();
    let eos = match candidate.eos.build(id) {
        Ok(eos) => eos,
        Err(e) => return CandidateOutcome::no_data(id, e.to_string()),
    };

    if let Some(failed) = constraints.iter().find(|c| !c.accepts(&eos)) {
        debug!(candidate = id, constraint = %failed.name, "Candidate rejected");
        return CandidateOutcome::rejected(id, failed.name.clone());
    }

    let mut wrapper = match TidalLoveWrapper::new(eos) {
        Ok(wrapper) => wrapper,
        Err(e) => return CandidateOutcome::no_data(id, e.to_string()),
    };
    if !config.checkpoints.is_empty() {
        let named: Vec<(&str, f64)> = config
            .checkpoints
            .iter()
            .map(|c| (c.name.as_str(), c.density))
            .collect();
        wrapper.set_named_checkpoint_by_density(&named);
    }

    let search = config.search.to_search_config();
    let outcome = evaluate_stars(id, &mut wrapper, &search);
    if let Err(e) = wrapper.close() {
        warn!(candidate = id, error = %e, "Failed to release EOS table");
    }
    outcome
}

fn evaluate_stars(
    id: &str,
    wrapper: &mut TidalLoveWrapper,
    search: &SearchConfig,
) -> CandidateOutcome {
    let max_mass = match wrapper.find_max_mass_with(search) {
        Ok(max_mass) => max_mass,
        Err(e) => return CandidateOutcome::no_data(id, e.to_string()),
    };

    let mut outcome = CandidateOutcome::bare(id.to_string(), CandidateStatus::Accepted);

    let star = if max_mass.mass >= search.target_mass {
        let star = wrapper.find_mass_with(search);
        if star.central_pressure.is_nan() {
            outcome.flags.push(FLAG_MASS_SEARCH_FAILED.to_string());
        }
        star
    } else {
        debug!(candidate = id, max_mass = max_mass.mass, "Target mass unreachable");
        outcome.flags.push(FLAG_BELOW_TARGET_MASS.to_string());
        TidalResult::new(wrapper.checkpoints().len())
    };

    let eos = wrapper.eos();
    let n0 = eos.saturation_density();
    let end = if max_mass.central_density.is_finite() {
        max_mass.central_density
    } else {
        eos.validity().max_density
    };
    outcome.sound = scan_sound_speed(eos, SOUND_SCAN_START * n0, end, SOUND_SCAN_SAMPLES);
    if let Some(scan) = &outcome.sound {
        outcome.flags.extend(sound_flags(scan));
    }

    outcome.star = Some(star);
    outcome.max_mass = Some(max_mass);
    outcome
}

/// Evaluate every candidate in parallel, one wrapper (and table file) per
/// candidate. Outcomes come back in configuration order.
pub fn run_batch(config: &RunConfig, progress: Option<ProgressCallback<'_>>) -> Vec<CandidateOutcome> {
    let started = Instant::now();
    let total = config.candidates.len();
    let constraints: Vec<PressureConstraint> = config
        .constraints
        .iter()
        .map(PressureConstraint::from_def)
        .collect();
    let completed = AtomicUsize::new(0);

    info!(run = %config.name, candidates = total, "Starting batch");
    let outcomes: Vec<CandidateOutcome> = config
        .candidates
        .par_iter()
        .map(|candidate| {
            let outcome = evaluate_candidate(candidate, config, &constraints);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(cb) = progress {
                cb(BatchProgressEvent {
                    stage: BatchStage::EvaluatingCandidates,
                    elapsed_wall_s: started.elapsed().as_secs_f64(),
                    completed: done,
                    total,
                    candidate_id: Some(outcome.candidate_id.clone()),
                    message: None,
                });
            }
            outcome
        })
        .collect();

    let accepted = outcomes.iter().filter(|o| o.is_accepted()).count();
    info!(
        run = %config.name,
        accepted,
        elapsed_s = started.elapsed().as_secs_f64(),
        "Batch finished"
    );
    outcomes
}
