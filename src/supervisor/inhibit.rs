use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};

use crate::logging::RunLog;

/// Keeps the machine awake for the duration of the run by holding a
/// `caffeinate` child tied to our pid. The `-w` flag means the child
/// exits on its own if we die without cleaning up.
#[derive(Clone)]
pub struct SleepInhibitor {
    child: Arc<Mutex<Option<Child>>>,
}

impl SleepInhibitor {
    /// Spawn caffeinate. Failure to start it degrades to a warning; a
    /// run on a machine without caffeinate just risks sleeping.
    pub fn start(log: &Arc<RunLog>) -> Self {
        let pid = std::process::id().to_string();
        let child = match Command::new("caffeinate")
            .args(["-dims", "-w", &pid])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => {
                log.debug(&format!("sleep inhibited (caffeinate pid {})", child.id()));
                Some(child)
            }
            Err(e) => {
                log.warning(&format!("could not start caffeinate: {}", e));
                None
            }
        };

        Self {
            child: Arc::new(Mutex::new(child)),
        }
    }

    /// Kill the caffeinate child. Safe to call from the cleanup path and
    /// again afterwards; only the first call finds a child to reap.
    pub fn stop(&self) {
        if let Ok(mut slot) = self.child.lock() {
            if let Some(mut child) = slot.take() {
                let _ = child.kill();
                let _ = child.wait();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_log(dir: &std::path::Path) -> Arc<RunLog> {
        Arc::new(RunLog::create(dir.join("test.log"), false).unwrap())
    }

    #[test]
    fn test_stop_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let inhibitor = SleepInhibitor::start(&test_log(dir.path()));
        inhibitor.stop();
        inhibitor.stop();
    }

    #[test]
    fn test_clones_share_the_child() {
        let dir = tempfile::tempdir().unwrap();
        let inhibitor = SleepInhibitor::start(&test_log(dir.path()));
        let other = inhibitor.clone();
        other.stop();
        // the original's slot is drained too
        assert!(inhibitor.child.lock().unwrap().is_none());
    }
}
