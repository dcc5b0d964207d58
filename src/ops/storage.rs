use std::fs::Metadata;
use std::path::Path;
use std::time::{Duration, SystemTime};

use walkdir::WalkDir;

use super::Operation;
use crate::common::errors::MaintError;
use crate::common::format;
use crate::orchestrator::context::OpContext;

/// Remove diagnostic logs and crash reports older than the configured
/// cutoff. User logs go through the normal removal path; system logs are
/// root-owned and pruned with a privileged `find`.
pub struct LogClean;

const USER_LOG_DIRS: &[&str] = &["Library/Logs", "Library/Logs/DiagnosticReports"];
const SYSTEM_LOG_DIRS: &[&str] = &["/Library/Logs", "/Library/Logs/DiagnosticReports"];

fn is_stale(meta: &Metadata, days: u32) -> bool {
    let cutoff = Duration::from_secs(u64::from(days) * 86_400);
    match meta.modified() {
        Ok(modified) => match SystemTime::now().duration_since(modified) {
            Ok(age) => age > cutoff,
            // modified in the future: leave it alone
            Err(_) => false,
        },
        Err(_) => false,
    }
}

impl Operation for LogClean {
    fn id(&self) -> &'static str {
        "log-clean"
    }

    fn execute(&self, ctx: &mut OpContext) -> Result<(), MaintError> {
        let days = ctx.settings().log_stale_days;
        let mut freed = 0u64;

        if let Some(home) = dirs::home_dir() {
            for rel in USER_LOG_DIRS {
                let dir = home.join(rel);
                if !dir.is_dir() {
                    continue;
                }
                let stale: Vec<_> = WalkDir::new(&dir)
                    .follow_links(false)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                    .filter(|e| e.metadata().map(|m| is_stale(&m, days)).unwrap_or(false))
                    .map(|e| e.into_path())
                    .collect();
                for path in stale {
                    freed += ctx.remove_path(&path)?;
                }
            }
        }

        let mtime_arg = format!("+{}", days);
        for dir in SYSTEM_LOG_DIRS {
            if !Path::new(dir).is_dir() {
                continue;
            }
            let before = ctx.measure(Path::new(dir));
            ctx.run_privileged_ancillary(
                "find",
                &[dir, "-type", "f", "-mtime", &mtime_arg, "-delete"],
            );
            let after = ctx.measure(Path::new(dir));
            freed += ctx.record_freed(before, after);
        }

        ctx.info(&format!(
            "logs older than {} day(s) removed, {} freed",
            days,
            format::format_kb(freed)
        ));
        Ok(())
    }
}

/// Empty `~/.Trash`. The directory itself survives; Finder expects it.
pub struct TrashEmpty;

impl Operation for TrashEmpty {
    fn id(&self) -> &'static str {
        "trash-empty"
    }

    fn execute(&self, ctx: &mut OpContext) -> Result<(), MaintError> {
        let home = match dirs::home_dir() {
            Some(home) => home,
            None => {
                ctx.warn("no home directory, nothing to empty");
                return Ok(());
            }
        };

        let trash = home.join(".Trash");
        if !trash.is_dir() {
            ctx.info("trash is already empty");
            return Ok(());
        }

        let freed = ctx.clear_dir_contents(&trash)?;
        ctx.info(&format!("trash emptied, {} freed", format::format_kb(freed)));
        Ok(())
    }
}
