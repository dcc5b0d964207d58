//! Append-only, timestamped, leveled run log.
//!
//! Every line is written to the per-run log file and mirrored to the
//! console. The file shares its run timestamp with the report artifacts so
//! one run always produces one `.log`, one `.md`, and one `.html` with the
//! same stamp. Warnings and errors logged here are the same strings the
//! aggregator records on outcomes — nothing is silently dropped.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use colored::*;

use crate::common::errors::MaintError;

/// Log severity. SUCCESS is its own level so completed operations stand
/// out in both the console stream and the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    fn tag(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Success => "SUCCESS",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Write-only log stream for one run. Safe to share with the signal
/// watcher thread, which flushes it during cleanup.
pub struct RunLog {
    file: Mutex<BufWriter<File>>,
    path: PathBuf,
    verbose: bool,
}

impl RunLog {
    /// Open (append) the log file for this run.
    pub fn create(path: PathBuf, verbose: bool) -> Result<Self, MaintError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| MaintError::io(&path, e))?;
        Ok(Self {
            file: Mutex::new(BufWriter::new(file)),
            path,
            verbose,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn debug(&self, msg: &str) {
        self.write(LogLevel::Debug, msg);
    }

    pub fn info(&self, msg: &str) {
        self.write(LogLevel::Info, msg);
    }

    pub fn success(&self, msg: &str) {
        self.write(LogLevel::Success, msg);
    }

    pub fn warning(&self, msg: &str) {
        self.write(LogLevel::Warning, msg);
    }

    pub fn error(&self, msg: &str) {
        self.write(LogLevel::Error, msg);
    }

    fn write(&self, level: LogLevel, msg: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");

        if let Ok(mut file) = self.file.lock() {
            // Write failures must not take down the run; the console line
            // below still surfaces the message.
            let _ = writeln!(file, "[{}] [{}] {}", stamp, level.tag(), msg);
        }

        if level == LogLevel::Debug && !self.verbose {
            return;
        }

        let tag = match level {
            LogLevel::Debug => "debug".dimmed(),
            LogLevel::Info => "info".cyan(),
            LogLevel::Success => "ok".green().bold(),
            LogLevel::Warning => "warn".yellow().bold(),
            LogLevel::Error => "error".red().bold(),
        };
        match level {
            LogLevel::Warning | LogLevel::Error => eprintln!("  {:>5}  {}", tag, msg),
            _ => println!("  {:>5}  {}", tag, msg),
        }
    }

    /// Flush buffered lines to disk. Called by the cleanup path and at the
    /// end of a normal run; safe to call more than once.
    pub fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_are_timestamped_and_leveled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let log = RunLog::create(path.clone(), false).unwrap();
        log.info("starting");
        log.warning("one path missing");
        log.success("done");
        log.flush();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("[INFO] starting"));
        assert!(lines[1].contains("[WARNING] one path missing"));
        assert!(lines[2].contains("[SUCCESS] done"));
        // every line starts with a bracketed timestamp
        assert!(lines.iter().all(|l| l.starts_with('[')));
    }

    #[test]
    fn test_debug_lines_reach_the_file_regardless_of_verbosity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let log = RunLog::create(path.clone(), false).unwrap();
        log.debug("internal detail");
        log.flush();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[DEBUG] internal detail"));
    }

    #[test]
    fn test_append_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        {
            let log = RunLog::create(path.clone(), false).unwrap();
            log.info("first");
            log.flush();
        }
        {
            let log = RunLog::create(path.clone(), false).unwrap();
            log.info("second");
            log.flush();
        }
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("first"));
        assert!(contents.contains("second"));
    }
}
