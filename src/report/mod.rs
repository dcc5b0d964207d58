pub mod accountant;
pub mod render;

use chrono::{DateTime, Local};
use serde::Serialize;

// ─── Outcomes ─────────────────────────────────────────────────────────────────

/// Terminal status of one operation within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Completed,
    Skipped,
    Failed,
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeStatus::Completed => write!(f, "Completed"),
            OutcomeStatus::Skipped => write!(f, "Skipped"),
            OutcomeStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// The record of one operation's execution. Created when the operation
/// begins, appended to the report once, never mutated after recording.
#[derive(Debug, Clone, Serialize)]
pub struct OperationOutcome {
    pub operation_id: String,
    pub status: OutcomeStatus,
    pub space_freed_kb: u64,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl OperationOutcome {
    /// Outcome for an operation the user (or a skip rule) declined.
    /// Skipped outcomes never carry errors.
    pub fn skipped(operation_id: &str, started_at: DateTime<Local>) -> Self {
        Self {
            operation_id: operation_id.to_string(),
            status: OutcomeStatus::Skipped,
            space_freed_kb: 0,
            warnings: Vec::new(),
            errors: Vec::new(),
            started_at,
            finished_at: Local::now(),
        }
    }

    pub fn duration_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

// ─── Environment snapshot ─────────────────────────────────────────────────────

/// Host facts captured once per run and rendered into both report formats
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentSnapshot {
    pub os_version: String,
    pub hostname: String,
    pub disk_total_kb: u64,
    pub disk_free_before_kb: u64,
    pub disk_free_after_kb: u64,
}

// ─── Report ───────────────────────────────────────────────────────────────────

/// Derived totals over a report's outcomes. Always computed from the
/// outcome list itself so the counts can never drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunTotals {
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub warnings: usize,
    pub errors: usize,
    pub space_freed_kb: u64,
}

/// The complete record of one orchestration run. Built incrementally by
/// the single-writer aggregator, finalized once, rendered, never mutated
/// again.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<OperationOutcome>,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    pub environment: EnvironmentSnapshot,
}

impl RunReport {
    pub fn new(environment: EnvironmentSnapshot) -> Self {
        Self {
            outcomes: Vec::new(),
            started_at: Local::now(),
            finished_at: None,
            environment,
        }
    }

    /// Append one outcome. This is the only write path into the report;
    /// a skipped outcome with errors indicates a bug in the caller.
    pub fn record_outcome(&mut self, outcome: OperationOutcome) {
        debug_assert!(
            outcome.status != OutcomeStatus::Skipped || outcome.errors.is_empty(),
            "skipped outcomes carry no errors"
        );
        self.outcomes.push(outcome);
    }

    /// Stamp the end of the run and the post-run disk reading.
    /// The first call wins; later calls are no-ops.
    pub fn finalize(&mut self, disk_free_after_kb: u64) {
        if self.finished_at.is_none() {
            self.finished_at = Some(Local::now());
            self.environment.disk_free_after_kb = disk_free_after_kb;
        }
    }

    /// Aggregate totals, recomputed from the outcome list on every call
    pub fn totals(&self) -> RunTotals {
        RunTotals {
            completed: self.count(OutcomeStatus::Completed),
            skipped: self.count(OutcomeStatus::Skipped),
            failed: self.count(OutcomeStatus::Failed),
            warnings: self.outcomes.iter().map(|o| o.warnings.len()).sum(),
            errors: self.outcomes.iter().map(|o| o.errors.len()).sum(),
            space_freed_kb: self.outcomes.iter().map(|o| o.space_freed_kb).sum(),
        }
    }

    pub fn duration_secs(&self) -> f64 {
        let end = self.finished_at.unwrap_or_else(Local::now);
        (end - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    fn count(&self, status: OutcomeStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }
}
