//! Operation bodies for the maintenance catalogue.
//!
//! Each body implements [`Operation`] and is registered once in
//! [`build_catalogue`]. The registry owns the descriptors (id, risk,
//! category); bodies carry only their id and the work itself. An error
//! returned from `execute` fails that operation's outcome and the run
//! moves on to the next selected operation.

pub mod caches;
pub mod databases;
pub mod indexing;
pub mod memory;
pub mod network;
pub mod storage;
pub mod system;

use crate::common::errors::MaintError;
use crate::orchestrator::context::OpContext;

/// One maintenance operation's executable body
pub trait Operation: Send + Sync {
    /// Must match an id in the registry catalogue
    fn id(&self) -> &'static str;

    fn execute(&self, ctx: &mut OpContext) -> Result<(), MaintError>;
}

/// All operation bodies, in the registry's declaration order
pub fn build_catalogue() -> Vec<Box<dyn Operation>> {
    vec![
        Box::new(system::SoftwareUpdateCheck),
        Box::new(caches::UserCacheClean),
        Box::new(caches::SystemCacheClean),
        Box::new(storage::LogClean),
        Box::new(storage::TrashEmpty),
        Box::new(databases::SqliteVacuum),
        Box::new(indexing::SpotlightRebuild),
        Box::new(indexing::LaunchServicesRebuild),
        Box::new(network::DnsFlush),
        Box::new(system::MaintenanceScripts),
        Box::new(memory::MemoryPurge),
        Box::new(system::KextCacheRebuild),
        Box::new(network::NetworkReset),
    ]
}
