use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::logging::RunLog;

/// Refreshes the sudo timestamp in the background so privileged
/// operations late in a long run never stall on a password prompt.
///
/// Priming (`sudo -v`) is the one interactive step and happens up front.
/// Refreshes use `sudo -n -v` and are best effort; if one fails the
/// thread stops and later privileged commands surface their own errors.
#[derive(Clone)]
pub struct PrivilegeKeepAlive {
    stop: Arc<AtomicBool>,
}

impl PrivilegeKeepAlive {
    pub fn start(refresh_secs: u64, log: &Arc<RunLog>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));

        let primed = Command::new("sudo")
            .arg("-v")
            .status()
            .map(|s| s.success())
            .unwrap_or(false);

        if !primed {
            log.warning("could not cache sudo credentials; privileged operations may fail");
            return Self { stop };
        }
        log.debug("sudo credentials cached");

        let flag = Arc::clone(&stop);
        let log = Arc::clone(log);
        thread::spawn(move || loop {
            // Sleep in one-second slices so stop() is honored promptly
            for _ in 0..refresh_secs.max(1) {
                if flag.load(Ordering::SeqCst) {
                    return;
                }
                thread::sleep(Duration::from_secs(1));
            }

            let refreshed = Command::new("sudo")
                .args(["-n", "-v"])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(|s| s.success())
                .unwrap_or(false);
            if !refreshed {
                log.debug("sudo refresh failed, keep-alive stopping");
                return;
            }
            log.debug("sudo timestamp refreshed");
        });

        Self { stop }
    }

    /// Signal the refresh thread to stop. Safe to call more than once.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}
