use colored::*;

use super::args::OutputFormat;
use crate::common::format::{self, format_kb_colored};
use crate::orchestrator::RunSummary;
use crate::registry::Registry;

/// Print the operation catalogue, in declaration order
pub fn print_registry(registry: &Registry, output_format: &OutputFormat) {
    match output_format {
        OutputFormat::Json => {
            // Descriptors are Serialize; a static catalogue cannot fail here
            if let Ok(json) = serde_json::to_string_pretty(registry.list()) {
                println!("{}", json);
            }
        }
        OutputFormat::Human => {
            format::print_header("Operation Catalogue");
            for desc in registry.list() {
                println!(
                    "  {:<8} {:<10} {:<26} {}",
                    format::format_risk(desc.risk),
                    format!("{}", desc.category).dimmed(),
                    desc.id.bold(),
                    desc.description
                );
            }
            println!();
            println!(
                "  {} operations run in the order listed; filters never reorder them",
                registry.list().len()
            );
        }
    }
}

/// Print the end-of-run summary block
pub fn print_run_summary(summary: &RunSummary, output_format: &OutputFormat) {
    let totals = summary.report.totals();

    match output_format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "completed": totals.completed,
                "skipped": totals.skipped,
                "failed": totals.failed,
                "warnings": totals.warnings,
                "errors": totals.errors,
                "space_freed_kb": totals.space_freed_kb,
                "duration_secs": summary.report.duration_secs(),
                "markdown_report": summary.markdown_path,
                "html_report": summary.html_path,
                "log": summary.log_path,
            });
            match serde_json::to_string_pretty(&json) {
                Ok(text) => println!("{}", text),
                Err(e) => eprintln!("could not serialize summary: {}", e),
            }
        }
        OutputFormat::Human => {
            println!();
            println!("{}  Maintenance Run Summary", "🧰");
            println!("{}", "─".repeat(60).dimmed());
            println!(
                "  {} completed  •  {} skipped  •  {} failed",
                totals.completed.to_string().green().bold(),
                totals.skipped.to_string().yellow(),
                totals.failed.to_string().red()
            );
            println!(
                "  {} freed in {}",
                format_kb_colored(totals.space_freed_kb),
                format::format_duration(summary.report.duration_secs()).cyan()
            );
            if totals.warnings > 0 || totals.errors > 0 {
                println!(
                    "  {} warning(s), {} error(s) — details in the report",
                    totals.warnings.to_string().yellow(),
                    totals.errors.to_string().red()
                );
            }
            println!("{}", "─".repeat(60).dimmed());
            println!("  {} {}", "report:".dimmed(), summary.markdown_path.display());
            println!("  {} {}", "html:".dimmed(), summary.html_path.display());
            println!("  {} {}", "log:".dimmed(), summary.log_path.display());
            println!();
        }
    }
}
