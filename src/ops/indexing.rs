use super::Operation;
use crate::common::errors::MaintError;
use crate::orchestrator::context::OpContext;

/// Erase and rebuild the Spotlight index on the root volume. Indexing
/// continues in the background for hours afterwards; the operation only
/// kicks it off.
pub struct SpotlightRebuild;

impl Operation for SpotlightRebuild {
    fn id(&self) -> &'static str {
        "spotlight-rebuild"
    }

    fn execute(&self, ctx: &mut OpContext) -> Result<(), MaintError> {
        let output = ctx.run_privileged("mdutil", &["-E", "/"])?;
        ctx.debug(output.trim());
        ctx.info("spotlight index erase scheduled; reindexing runs in the background");
        Ok(())
    }
}

const LSREGISTER: &str = "/System/Library/Frameworks/CoreServices.framework\
/Frameworks/LaunchServices.framework/Support/lsregister";

/// Reset the LaunchServices database. Fixes duplicate and stale entries
/// in the Finder "Open With" menu.
pub struct LaunchServicesRebuild;

impl Operation for LaunchServicesRebuild {
    fn id(&self) -> &'static str {
        "launch-services-rebuild"
    }

    fn execute(&self, ctx: &mut OpContext) -> Result<(), MaintError> {
        ctx.run_command(
            LSREGISTER,
            &[
                "-kill",
                "-r",
                "-domain",
                "local",
                "-domain",
                "system",
                "-domain",
                "user",
            ],
        )?;
        // Finder picks up the rebuilt database on restart
        ctx.run_ancillary("killall", &["Finder"]);
        ctx.info("launch services database reset");
        Ok(())
    }
}
