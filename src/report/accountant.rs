use std::path::Path;

use walkdir::WalkDir;

/// Accumulates reclaimed disk space across operations.
///
/// The counter is monotonic: deltas are clamped at zero, so a denied or
/// partial deletion can never shrink the total. Precision is kilobytes;
/// human-readable unit conversion happens only at render time.
#[derive(Debug, Default)]
pub struct SpaceAccountant {
    total_kb: u64,
}

impl SpaceAccountant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the space freed by one deletion, measured immediately before
    /// it ran (`before_kb`) and immediately after (`after_kb`, zero when
    /// the target no longer exists). Returns the delta that was added.
    pub fn record_freed(&mut self, before_kb: u64, after_kb: u64) -> u64 {
        let delta = before_kb.saturating_sub(after_kb);
        self.total_kb += delta;
        delta
    }

    pub fn total_kb(&self) -> u64 {
        self.total_kb
    }
}

/// Measure the on-disk size of a path in kilobytes. Missing paths measure
/// zero; unreadable entries are skipped rather than failing the measure.
pub fn measure_kb(path: &Path) -> u64 {
    if !path.exists() {
        return 0;
    }
    if path.is_file() {
        return path.metadata().map(|m| m.len() / 1024).unwrap_or(0);
    }

    let bytes: u64 = WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum();
    bytes / 1024
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_total_is_sum_of_deltas() {
        let mut acc = SpaceAccountant::new();
        assert_eq!(acc.record_freed(100, 0), 100);
        assert_eq!(acc.record_freed(50, 20), 30);
        assert_eq!(acc.total_kb(), 130);
    }

    #[test]
    fn test_denied_deletion_records_zero() {
        let mut acc = SpaceAccountant::new();
        acc.record_freed(100, 0);
        // target grew or the measure raced: delta clamps to zero
        assert_eq!(acc.record_freed(40, 90), 0);
        assert_eq!(acc.total_kb(), 100);
    }

    #[test]
    fn test_never_decreases() {
        let mut acc = SpaceAccountant::new();
        let mut last = 0;
        for (before, after) in [(10, 0), (0, 0), (5, 9), (20, 3)] {
            acc.record_freed(before, after);
            assert!(acc.total_kb() >= last);
            last = acc.total_kb();
        }
    }

    #[test]
    fn test_measure_missing_path_is_zero() {
        assert_eq!(measure_kb(Path::new("/nonexistent/xyz123")), 0);
    }

    #[test]
    fn test_measure_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = std::fs::File::create(dir.path().join("a.bin")).unwrap();
        f.write_all(&vec![0u8; 4096]).unwrap();
        f.flush().unwrap();
        assert_eq!(measure_kb(dir.path()), 4);
    }
}
