//! Once-only cleanup across every exit path.
//!
//! The same cleanup closure is wired to three triggers: SIGINT/SIGTERM, a
//! panic, and the normal end of the run. An atomic flag guarantees it
//! runs exactly once no matter which trigger fires first, or how many do.

use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

pub type CleanupFn = Arc<dyn Fn() + Send + Sync>;

static CLEANUP_DONE: AtomicBool = AtomicBool::new(false);

fn run_once(cleanup: &CleanupFn) {
    if !CLEANUP_DONE.swap(true, Ordering::SeqCst) {
        cleanup();
    }
}

/// Arms the cleanup closure against signals and panics. The run loop
/// holds the guard and calls [`SignalGuard::shutdown`] on the normal
/// path; a delivered signal exits with the conventional `128 + signo`.
pub struct SignalGuard {
    cleanup: CleanupFn,
}

impl SignalGuard {
    pub fn install(cleanup: CleanupFn) -> Self {
        CLEANUP_DONE.store(false, Ordering::SeqCst);

        let for_signals = Arc::clone(&cleanup);
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM]) {
            thread::spawn(move || {
                if let Some(signo) = signals.forever().next() {
                    run_once(&for_signals);
                    std::process::exit(128 + signo);
                }
            });
        }

        let for_panics = Arc::clone(&cleanup);
        let prev = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            run_once(&for_panics);
            prev(info);
        }));

        Self { cleanup }
    }

    /// Cleanup for the normal exit path. After this, the signal and
    /// panic triggers are no-ops.
    pub fn shutdown(&self) {
        run_once(&self.cleanup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    // both tests poke the shared CLEANUP_DONE flag; serialize them
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_shutdown_runs_cleanup_exactly_once() {
        let _serial = TEST_LOCK.lock().unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&counter);
        let cleanup: CleanupFn = Arc::new(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        CLEANUP_DONE.store(false, Ordering::SeqCst);
        run_once(&cleanup);
        run_once(&cleanup);
        run_once(&cleanup);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_install_rearms_the_flag() {
        let _serial = TEST_LOCK.lock().unwrap();
        CLEANUP_DONE.store(true, Ordering::SeqCst);
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&counter);
        let guard = SignalGuard::install(Arc::new(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        guard.shutdown();
        guard.shutdown();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
