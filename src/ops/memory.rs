use super::Operation;
use crate::common::errors::MaintError;
use crate::orchestrator::context::OpContext;

/// Force the disk cache out of memory with `purge`. Frees RAM rather
/// than disk, so the accountant records nothing here.
pub struct MemoryPurge;

impl Operation for MemoryPurge {
    fn id(&self) -> &'static str {
        "memory-purge"
    }

    fn execute(&self, ctx: &mut OpContext) -> Result<(), MaintError> {
        ctx.run_privileged("purge", &[])?;
        ctx.info("disk cache purged from memory");
        Ok(())
    }
}
