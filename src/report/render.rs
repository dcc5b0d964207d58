//! Report synthesis: one `RunReport` in, Markdown and HTML artifacts out.
//!
//! Both renderers are pure functions of the report plus its captured
//! environment snapshot, and must present identical factual totals under
//! different markup. Shared helpers below produce every number exactly
//! once so the two formats cannot disagree.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::common::errors::MaintError;
use crate::common::format::{format_duration, format_kb};
use crate::registry::{Category, Registry};
use crate::report::{OperationOutcome, OutcomeStatus, RunReport, RunTotals};

const TIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

// ─── Shared fact helpers ──────────────────────────────────────────────────────

fn stamp(t: DateTime<Local>) -> String {
    t.format(TIME_FMT).to_string()
}

fn summary_cells(totals: &RunTotals) -> [(&'static str, String); 6] {
    [
        ("Completed", totals.completed.to_string()),
        ("Skipped", totals.skipped.to_string()),
        ("Failed", totals.failed.to_string()),
        ("Warnings", totals.warnings.to_string()),
        ("Errors", totals.errors.to_string()),
        ("Space freed", format_kb(totals.space_freed_kb)),
    ]
}

fn environment_cells(report: &RunReport) -> [(&'static str, String); 5] {
    let env = &report.environment;
    [
        ("macOS version", env.os_version.clone()),
        ("Hostname", env.hostname.clone()),
        ("Disk capacity", format_kb(env.disk_total_kb)),
        ("Free before run", format_kb(env.disk_free_before_kb)),
        ("Free after run", format_kb(env.disk_free_after_kb)),
    ]
}

fn outcome_line(outcome: &OperationOutcome) -> String {
    format!(
        "{} — {} in {}, {} freed",
        outcome.operation_id,
        outcome.status,
        format_duration(outcome.duration_secs()),
        format_kb(outcome.space_freed_kb)
    )
}

/// Outcomes grouped by registry category, preserving run order inside
/// each group. Ids missing from the registry (impossible through the
/// orchestrator) fall back to System.
fn outcomes_by_category(report: &RunReport) -> Vec<(Category, Vec<&OperationOutcome>)> {
    let registry = Registry::new();
    let mut groups: Vec<(Category, Vec<&OperationOutcome>)> = Vec::new();
    for outcome in &report.outcomes {
        let category = registry
            .get(&outcome.operation_id)
            .map(|d| d.category)
            .unwrap_or(Category::System);
        match groups.iter_mut().find(|(c, _)| *c == category) {
            Some((_, list)) => list.push(outcome),
            None => groups.push((category, vec![outcome])),
        }
    }
    groups
}

// ─── Markdown ─────────────────────────────────────────────────────────────────

pub fn render_markdown(report: &RunReport) -> String {
    let totals = report.totals();
    let mut md = String::new();

    md.push_str("# macOS Maintenance Report\n\n");
    md.push_str(&format!("- **Started:** {}\n", stamp(report.started_at)));
    if let Some(finished) = report.finished_at {
        md.push_str(&format!("- **Finished:** {}\n", stamp(finished)));
    }
    md.push_str(&format!(
        "- **Duration:** {}\n\n",
        format_duration(report.duration_secs())
    ));

    md.push_str("## Environment\n\n");
    md.push_str("| Fact | Value |\n|---|---|\n");
    for (key, value) in environment_cells(report) {
        md.push_str(&format!("| {} | {} |\n", key, value));
    }
    md.push('\n');

    md.push_str("## Summary\n\n");
    md.push_str("| Metric | Value |\n|---|---|\n");
    for (key, value) in summary_cells(&totals) {
        md.push_str(&format!("| {} | {} |\n", key, value));
    }
    md.push('\n');

    md.push_str("## Operations\n\n");
    if report.outcomes.is_empty() {
        md.push_str("_No operations were selected._\n");
    }
    for (category, outcomes) in outcomes_by_category(report) {
        md.push_str(&format!("### {}\n\n", category));
        for outcome in outcomes {
            let marker = match outcome.status {
                OutcomeStatus::Completed => "[x]",
                OutcomeStatus::Skipped => "[ ]",
                OutcomeStatus::Failed => "[!]",
            };
            md.push_str(&format!("- {} {}\n", marker, outcome_line(outcome)));
            for warning in &outcome.warnings {
                md.push_str(&format!("  - warning: {}\n", warning));
            }
            for error in &outcome.errors {
                md.push_str(&format!("  - error: {}\n", error));
            }
        }
        md.push('\n');
    }

    md
}

// ─── HTML ─────────────────────────────────────────────────────────────────────

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn render_html(report: &RunReport) -> String {
    let totals = report.totals();
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>macOS Maintenance Report</title>\n<style>\n");
    html.push_str(
        "body{font-family:-apple-system,Helvetica,sans-serif;margin:2em;color:#1d1d1f}\n\
         table{border-collapse:collapse;margin:1em 0}\n\
         td,th{border:1px solid #d2d2d7;padding:4px 12px;text-align:left}\n\
         .completed{color:#248a3d}.skipped{color:#8e8e93}.failed{color:#d70015}\n\
         .warning{color:#c48a00}.error{color:#d70015}\n",
    );
    html.push_str("</style>\n</head>\n<body>\n");

    html.push_str("<h1>macOS Maintenance Report</h1>\n<ul>\n");
    html.push_str(&format!("<li><b>Started:</b> {}</li>\n", stamp(report.started_at)));
    if let Some(finished) = report.finished_at {
        html.push_str(&format!("<li><b>Finished:</b> {}</li>\n", stamp(finished)));
    }
    html.push_str(&format!(
        "<li><b>Duration:</b> {}</li>\n</ul>\n",
        format_duration(report.duration_secs())
    ));

    html.push_str("<h2>Environment</h2>\n<table>\n");
    for (key, value) in environment_cells(report) {
        html.push_str(&format!(
            "<tr><th>{}</th><td>{}</td></tr>\n",
            key,
            escape(&value)
        ));
    }
    html.push_str("</table>\n");

    html.push_str("<h2>Summary</h2>\n<table>\n");
    for (key, value) in summary_cells(&totals) {
        html.push_str(&format!("<tr><th>{}</th><td>{}</td></tr>\n", key, value));
    }
    html.push_str("</table>\n");

    html.push_str("<h2>Operations</h2>\n");
    if report.outcomes.is_empty() {
        html.push_str("<p><i>No operations were selected.</i></p>\n");
    }
    for (category, outcomes) in outcomes_by_category(report) {
        html.push_str(&format!("<h3>{}</h3>\n<ul>\n", category));
        for outcome in outcomes {
            let class = match outcome.status {
                OutcomeStatus::Completed => "completed",
                OutcomeStatus::Skipped => "skipped",
                OutcomeStatus::Failed => "failed",
            };
            html.push_str(&format!(
                "<li class=\"{}\">{}",
                class,
                escape(&outcome_line(outcome))
            ));
            if !outcome.warnings.is_empty() || !outcome.errors.is_empty() {
                html.push_str("<ul>\n");
                for warning in &outcome.warnings {
                    html.push_str(&format!(
                        "<li class=\"warning\">warning: {}</li>\n",
                        escape(warning)
                    ));
                }
                for error in &outcome.errors {
                    html.push_str(&format!(
                        "<li class=\"error\">error: {}</li>\n",
                        escape(error)
                    ));
                }
                html.push_str("</ul>\n");
            }
            html.push_str("</li>\n");
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

// ─── Artifacts ────────────────────────────────────────────────────────────────

/// Write both report artifacts. The filenames share the run stamp with
/// the log file so one run is always one `.log` + `.md` + `.html` triple.
pub fn write_artifacts(
    report: &RunReport,
    dir: &Path,
    run_stamp: &str,
) -> Result<(PathBuf, PathBuf), MaintError> {
    let md_path = dir.join(format!("maintenance_report_{}.md", run_stamp));
    let html_path = dir.join(format!("maintenance_report_{}.html", run_stamp));

    std::fs::write(&md_path, render_markdown(report)).map_err(|e| MaintError::io(&md_path, e))?;
    std::fs::write(&html_path, render_html(report)).map_err(|e| MaintError::io(&html_path, e))?;

    Ok((md_path, html_path))
}
