use std::path::Path;

use super::Operation;
use crate::common::errors::MaintError;
use crate::common::format;
use crate::common::safety;
use crate::orchestrator::context::OpContext;

/// Prune `~/Library/Caches`. Applications rebuild their caches lazily,
/// so everything inside is disposable; the directory itself stays.
pub struct UserCacheClean;

impl Operation for UserCacheClean {
    fn id(&self) -> &'static str {
        "user-cache-clean"
    }

    fn execute(&self, ctx: &mut OpContext) -> Result<(), MaintError> {
        let home = match dirs::home_dir() {
            Some(home) => home,
            None => {
                ctx.warn("no home directory, nothing to clean");
                return Ok(());
            }
        };

        let caches = home.join("Library/Caches");
        if !caches.is_dir() {
            ctx.warn(&format!("'{}' does not exist", caches.display()));
            return Ok(());
        }

        let freed = ctx.clear_dir_contents(&caches)?;
        ctx.info(&format!("user caches pruned, {} freed", format::format_kb(freed)));
        Ok(())
    }
}

/// Prune `/Library/Caches`. Entries are often root-owned, so removal
/// goes through sudo; the measure pair still credits only space that
/// actually disappeared.
pub struct SystemCacheClean;

impl Operation for SystemCacheClean {
    fn id(&self) -> &'static str {
        "system-cache-clean"
    }

    fn execute(&self, ctx: &mut OpContext) -> Result<(), MaintError> {
        let caches = Path::new("/Library/Caches");
        if !caches.is_dir() {
            ctx.warn("'/Library/Caches' does not exist");
            return Ok(());
        }

        let entries = match std::fs::read_dir(caches) {
            Ok(entries) => entries,
            Err(e) => {
                ctx.warn(&format!("could not read '/Library/Caches': {}", e));
                return Ok(());
            }
        };

        let before = ctx.measure(caches);
        for entry in entries.flatten() {
            let path = entry.path();
            if safety::is_protected(&path) || safety::is_sip_protected(&path) {
                continue;
            }
            let path_str = path.to_string_lossy().into_owned();
            ctx.run_privileged_ancillary("rm", &["-rf", &path_str]);
        }
        let after = ctx.measure(caches);

        let freed = ctx.record_freed(before, after);
        ctx.info(&format!("system caches pruned, {} freed", format::format_kb(freed)));
        Ok(())
    }
}
