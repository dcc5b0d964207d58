use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

/// Estimate seconds remaining from the work done so far.
///
/// Zero until at least one unit has completed and measurable time has
/// passed; an estimate from nothing would divide by zero and mean nothing.
pub fn compute_eta_secs(total: u64, current: u64, elapsed_secs: f64) -> f64 {
    if current == 0 || elapsed_secs <= 0.0 {
        return 0.0;
    }
    let remaining = total.saturating_sub(current) as f64;
    elapsed_secs / current as f64 * remaining
}

/// Whole-percent completion, truncated
pub fn compute_percent(total: u64, current: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    current * 100 / total
}

/// Tracks run progress across the selected operations and drives the
/// console progress bar. The bar is cosmetic; the counters here are what
/// the log lines and ETA are computed from.
pub struct ProgressTracker {
    total: u64,
    current: u64,
    started: Instant,
    bar: Option<ProgressBar>,
}

impl ProgressTracker {
    pub fn new(total: u64, show_bar: bool) -> Self {
        let bar = if show_bar && total > 0 {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap()
                    .progress_chars("━━░"),
            );
            Some(pb)
        } else {
            None
        };
        Self {
            total,
            current: 0,
            started: Instant::now(),
            bar,
        }
    }

    /// Mark one operation done and show the next label on the bar.
    pub fn advance(&mut self, label: &str) {
        self.current = (self.current + 1).min(self.total);
        if let Some(ref pb) = self.bar {
            pb.set_message(label.to_string());
            pb.inc(1);
        }
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn percent(&self) -> u64 {
        compute_percent(self.total, self.current)
    }

    pub fn eta_secs(&self) -> f64 {
        compute_eta_secs(self.total, self.current, self.started.elapsed().as_secs_f64())
    }

    /// Progress line for the run log, e.g. `[3/13] 23% eta 41s`
    pub fn status_line(&self) -> String {
        let eta = self.eta_secs();
        if eta > 0.0 {
            format!(
                "[{}/{}] {}% eta {}s",
                self.current,
                self.total,
                self.percent(),
                eta.round() as u64
            )
        } else {
            format!("[{}/{}] {}%", self.current, self.total, self.percent())
        }
    }

    pub fn finish(&self) {
        if let Some(ref pb) = self.bar {
            pb.finish_and_clear();
        }
    }
}
