use super::Operation;
use crate::common::errors::MaintError;
use crate::orchestrator::context::OpContext;

/// Query Apple Software Update for pending updates. Network dependent,
/// which is why the catalogue declares it first, well before anything
/// that could sever connectivity.
pub struct SoftwareUpdateCheck;

/// `softwareupdate -l` lists each pending update as a `* Label:` line
fn count_pending_updates(output: &str) -> usize {
    output
        .lines()
        .filter(|line| line.trim_start().starts_with('*'))
        .count()
}

impl Operation for SoftwareUpdateCheck {
    fn id(&self) -> &'static str {
        "software-update-check"
    }

    fn execute(&self, ctx: &mut OpContext) -> Result<(), MaintError> {
        let output = ctx.run_command("softwareupdate", &["-l"])?;
        let pending = count_pending_updates(&output);
        if pending == 0 {
            ctx.info("no pending software updates");
        } else {
            ctx.warn(&format!(
                "{} pending software update(s); install them before heavy maintenance",
                pending
            ));
        }
        Ok(())
    }
}

/// Run the BSD periodic scripts in one shot instead of waiting for
/// their overnight schedule.
pub struct MaintenanceScripts;

impl Operation for MaintenanceScripts {
    fn id(&self) -> &'static str {
        "maintenance-scripts"
    }

    fn execute(&self, ctx: &mut OpContext) -> Result<(), MaintError> {
        ctx.run_privileged("periodic", &["daily", "weekly", "monthly"])?;
        ctx.info("periodic daily/weekly/monthly scripts completed");
        Ok(())
    }
}

/// Rebuild the kernel extension caches. Slow, occasionally needs a
/// reboot to take effect, and harmless to run when nothing changed.
pub struct KextCacheRebuild;

impl Operation for KextCacheRebuild {
    fn id(&self) -> &'static str {
        "kext-cache-rebuild"
    }

    fn execute(&self, ctx: &mut OpContext) -> Result<(), MaintError> {
        ctx.run_privileged_ancillary("touch", &["/Library/Extensions"]);
        let output = ctx.run_privileged("kextcache", &["-i", "/"])?;
        ctx.debug(output.trim());
        ctx.info("kernel extension caches rebuilt; changes apply after reboot");
        Ok(())
    }
}
