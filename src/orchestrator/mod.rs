//! Drives one maintenance run end to end: preflight, selection,
//! confirmation, execution, aggregation, and report synthesis.
//!
//! The orchestrator is the single writer of the run report. Operation
//! bodies only ever see their own [`OpContext`]; outcomes flow back here
//! and are appended exactly once.

pub mod confirm;
pub mod context;
pub mod progress;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use colored::*;

use crate::common::config::{RunConfiguration, Settings};
use crate::common::errors::MaintError;
use crate::common::format;
use crate::logging::RunLog;
use crate::ops::{self, Operation};
use crate::registry::selector::resolve_selection;
use crate::registry::Registry;
use crate::report::accountant::SpaceAccountant;
use crate::report::render::write_artifacts;
use crate::report::{OperationOutcome, OutcomeStatus, RunReport};
use crate::supervisor::{self, guard::SignalGuard, inhibit::SleepInhibitor, keepalive::PrivilegeKeepAlive};

use self::context::OpContext;
use self::progress::ProgressTracker;

/// Everything a finished run hands back to the CLI layer
pub struct RunSummary {
    pub report: RunReport,
    pub markdown_path: PathBuf,
    pub html_path: PathBuf,
    pub log_path: PathBuf,
}

/// Build the outcome for one executed operation. An error the body let
/// escape becomes a Failed outcome; the run itself keeps going.
fn outcome_for(
    operation_id: &str,
    started_at: DateTime<Local>,
    result: Result<(), MaintError>,
    space_freed_kb: u64,
    warnings: Vec<String>,
) -> OperationOutcome {
    let (status, errors) = match result {
        Ok(()) => (OutcomeStatus::Completed, Vec::new()),
        Err(e) => (OutcomeStatus::Failed, vec![e.to_string()]),
    };
    OperationOutcome {
        operation_id: operation_id.to_string(),
        status,
        space_freed_kb,
        warnings,
        errors,
        started_at,
        finished_at: Local::now(),
    }
}

/// Execute one full maintenance run.
///
/// Fatal errors (failed preflight, unknown operation id) abort before any
/// operation executes. Per-operation failures are recorded on the report
/// and the run continues with the next selected operation.
pub fn run(config: RunConfiguration, settings: Settings) -> Result<RunSummary> {
    let registry = Registry::new();
    let selected = resolve_selection(&registry, &config)?;

    let disk_before = supervisor::preflight(settings.min_free_gb)?;
    settings.init_dirs()?;

    let run_stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let log_path = settings.log_dir.join(format!("maintenance_{}.log", run_stamp));
    let log = Arc::new(RunLog::create(log_path.clone(), config.verbose)?);

    let environment = supervisor::environment_snapshot(&disk_before);
    let mut report = RunReport::new(environment);

    log.info(&format!(
        "starting maintenance run on {} ({})",
        report.environment.hostname, report.environment.os_version
    ));
    log.info(&format!(
        "{} free of {} before run, {} operation(s) selected",
        format::format_kb(disk_before.free_kb),
        format::format_kb(disk_before.total_kb),
        selected.len()
    ));

    let inhibitor = SleepInhibitor::start(&log);
    let keepalive = PrivilegeKeepAlive::start(settings.sudo_refresh_secs, &log);

    let guard = {
        let log = Arc::clone(&log);
        let inhibitor = inhibitor.clone();
        let keepalive = keepalive.clone();
        SignalGuard::install(Arc::new(move || {
            keepalive.stop();
            inhibitor.stop();
            log.flush();
        }))
    };

    let mut bodies: HashMap<&'static str, Box<dyn Operation>> = ops::build_catalogue()
        .into_iter()
        .map(|op| (op.id(), op))
        .collect();

    let mut accountant = SpaceAccountant::new();
    let mut tracker = ProgressTracker::new(selected.len() as u64, !config.verbose);

    for desc in &selected {
        let started = Local::now();

        if !confirm::confirm(desc, &config, &log) {
            log.info(&format!("skipped '{}'", desc.id));
            report.record_outcome(OperationOutcome::skipped(desc.id, started));
            tracker.advance(desc.id);
            log.debug(&tracker.status_line());
            continue;
        }

        log.info(&format!("running '{}': {}", desc.id, desc.description));

        let outcome = match bodies.remove(desc.id) {
            Some(body) => {
                let mut ctx = OpContext::new(&log, &config, &settings, &mut accountant);
                let result = body.execute(&mut ctx);
                let (freed_kb, warnings) = ctx.finish();
                match &result {
                    Ok(()) => log.success(&format!(
                        "'{}' completed, {} freed",
                        desc.id,
                        format::format_kb(freed_kb)
                    )),
                    Err(e) => log.error(&format!("'{}' failed: {}", desc.id, e)),
                }
                outcome_for(desc.id, started, result, freed_kb, warnings)
            }
            None => {
                log.error(&format!("no body registered for '{}'", desc.id));
                OperationOutcome {
                    operation_id: desc.id.to_string(),
                    status: OutcomeStatus::Failed,
                    space_freed_kb: 0,
                    warnings: Vec::new(),
                    errors: vec![format!("no body registered for '{}'", desc.id)],
                    started_at: started,
                    finished_at: Local::now(),
                }
            }
        };

        report.record_outcome(outcome);
        tracker.advance(desc.id);
        log.info(&tracker.status_line());
    }

    tracker.finish();

    // Post-run disk reading is best effort; the pre-run figure stands in
    // if the measure fails here.
    let disk_after_kb = match supervisor::disk_space() {
        Ok(disk) => disk.free_kb,
        Err(e) => {
            log.warning(&format!("could not measure free space after run: {}", e));
            disk_before.free_kb
        }
    };
    report.finalize(disk_after_kb);

    let (markdown_path, html_path) = write_artifacts(&report, &settings.report_dir, &run_stamp)
        .context("failed to write report artifacts")?;

    let totals = report.totals();
    log.success(&format!(
        "run finished in {}: {} completed, {} skipped, {} failed, {} freed",
        format::format_duration(report.duration_secs()),
        totals.completed,
        totals.skipped,
        totals.failed,
        format::format_kb(totals.space_freed_kb)
    ));
    log.info(&format!("report: {}", markdown_path.display()));
    log.info(&format!("log: {}", log.path().display()));

    guard.shutdown();

    println!("{}", "─".repeat(60).dimmed());

    Ok(RunSummary {
        report,
        markdown_path,
        html_path,
        log_path,
    })
}
