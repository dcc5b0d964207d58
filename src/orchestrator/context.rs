use std::path::Path;
use std::process::Command;

use crate::common::config::{RunConfiguration, Settings};
use crate::common::errors::MaintError;
use crate::common::safety;
use crate::logging::RunLog;
use crate::report::accountant::{measure_kb, SpaceAccountant};

use super::confirm;
use super::progress::ProgressTracker;

/// Everything an operation body may touch while it runs: the run log, the
/// run configuration, and the shared space accountant. One context is
/// built per operation and torn down into its outcome fields afterwards.
pub struct OpContext<'a> {
    log: &'a RunLog,
    config: &'a RunConfiguration,
    settings: &'a Settings,
    accountant: &'a mut SpaceAccountant,
    warnings: Vec<String>,
    freed_kb: u64,
    steps: Option<ProgressTracker>,
}

impl<'a> OpContext<'a> {
    pub fn new(
        log: &'a RunLog,
        config: &'a RunConfiguration,
        settings: &'a Settings,
        accountant: &'a mut SpaceAccountant,
    ) -> Self {
        Self {
            log,
            config,
            settings,
            accountant,
            warnings: Vec::new(),
            freed_kb: 0,
            steps: None,
        }
    }

    pub fn log(&self) -> &RunLog {
        self.log
    }

    pub fn config(&self) -> &RunConfiguration {
        self.config
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    /// Record a warning on the active operation and surface it in the log.
    /// The same string ends up on the outcome, never only in one place.
    pub fn warn(&mut self, msg: &str) {
        self.log.warning(msg);
        self.warnings.push(msg.to_string());
    }

    pub fn info(&self, msg: &str) {
        self.log.info(msg);
    }

    pub fn debug(&self, msg: &str) {
        self.log.debug(msg);
    }

    /// Ask before a destructive sub-step inside this operation. Obeys the
    /// run's auto-confirm setting; a decline skips the sub-step only.
    pub fn confirm_step(&self, prompt: &str) -> bool {
        confirm::confirm_step(prompt, self.config, self.log)
    }

    /// Scope a step counter to this operation's own sub-steps. The counter
    /// is independent of the run-level tracker.
    pub fn begin_steps(&mut self, total: u64) {
        self.steps = Some(ProgressTracker::new(total, false));
    }

    /// Mark one sub-step done. A no-op unless [`OpContext::begin_steps`]
    /// was called first.
    pub fn step(&mut self, label: &str) {
        if let Some(ref mut steps) = self.steps {
            steps.advance(label);
            self.log.debug(&format!("{} {}", steps.status_line(), label));
        }
    }

    /// Run a required external command. A spawn failure or non-zero exit
    /// fails the operation. Returns captured stdout on success.
    pub fn run_command(&mut self, program: &str, args: &[&str]) -> Result<String, MaintError> {
        self.log.debug(&format!("exec: {} {}", program, args.join(" ")));
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| MaintError::CommandFailed {
                program: program.to_string(),
                detail: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MaintError::CommandFailed {
                program: program.to_string(),
                detail: match stderr.trim() {
                    "" => format!("exit status {}", output.status),
                    detail => detail.to_string(),
                },
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run a best-effort external command. Failure becomes a warning on
    /// the outcome and the operation keeps going. Returns whether the
    /// command succeeded.
    pub fn run_ancillary(&mut self, program: &str, args: &[&str]) -> bool {
        match self.run_command(program, args) {
            Ok(_) => true,
            Err(e) => {
                self.warn(&e.to_string());
                false
            }
        }
    }

    /// Run a required command under sudo with cached credentials
    pub fn run_privileged(&mut self, program: &str, args: &[&str]) -> Result<String, MaintError> {
        let mut sudo_args = vec!["-n", program];
        sudo_args.extend_from_slice(args);
        self.run_command("sudo", &sudo_args)
    }

    /// Best-effort command under sudo
    pub fn run_privileged_ancillary(&mut self, program: &str, args: &[&str]) -> bool {
        let mut sudo_args = vec!["-n", program];
        sudo_args.extend_from_slice(args);
        self.run_ancillary("sudo", &sudo_args)
    }

    /// Measure a path's on-disk size now. Pair with [`OpContext::record_freed`]
    /// around work the context cannot do itself, like a privileged removal
    /// or an in-place VACUUM.
    pub fn measure(&self, path: &Path) -> u64 {
        measure_kb(path)
    }

    /// Credit the accountant with the difference between two measures
    pub fn record_freed(&mut self, before_kb: u64, after_kb: u64) -> u64 {
        let freed = self.accountant.record_freed(before_kb, after_kb);
        self.freed_kb += freed;
        freed
    }

    /// Delete a file or directory, measuring before and after so the
    /// accountant only ever credits space that actually disappeared.
    ///
    /// Protected paths fail the operation outright; SIP paths and removal
    /// errors degrade to warnings. Returns the kilobytes freed.
    pub fn remove_path(&mut self, path: &Path) -> Result<u64, MaintError> {
        if safety::is_protected(path) {
            return Err(MaintError::ProtectedPath {
                path: path.to_path_buf(),
            });
        }
        if safety::is_sip_protected(path) {
            self.warn(&format!("'{}' is SIP protected, skipping", path.display()));
            return Ok(0);
        }
        if !path.exists() {
            return Ok(0);
        }

        let before = measure_kb(path);
        let result = if path.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        };
        if let Err(e) = result {
            // Partial removals still free space; measure what is left
            self.warn(&format!("could not remove '{}': {}", path.display(), e));
        }
        let after = measure_kb(path);

        let freed = self.accountant.record_freed(before, after);
        self.freed_kb += freed;
        Ok(freed)
    }

    /// Delete everything inside a directory without touching the directory
    /// itself. The usual shape for cache cleaning.
    pub fn clear_dir_contents(&mut self, dir: &Path) -> Result<u64, MaintError> {
        if !dir.is_dir() {
            return Ok(0);
        }
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                self.warn(&format!("could not read '{}': {}", dir.display(), e));
                return Ok(0);
            }
        };

        let mut freed = 0u64;
        for entry in entries.flatten() {
            freed += self.remove_path(&entry.path())?;
        }
        Ok(freed)
    }

    pub fn freed_kb(&self) -> u64 {
        self.freed_kb
    }

    /// Tear down into the fields the aggregator records on the outcome
    pub fn finish(self) -> (u64, Vec<String>) {
        (self.freed_kb, self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixtures(dir: &Path) -> (RunLog, RunConfiguration, Settings, SpaceAccountant) {
        let log = RunLog::create(dir.join("test.log"), false).unwrap();
        (
            log,
            RunConfiguration::default(),
            Settings::default(),
            SpaceAccountant::new(),
        )
    }

    #[test]
    fn test_remove_missing_path_frees_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (log, config, settings, mut acc) = fixtures(dir.path());
        let mut ctx = OpContext::new(&log, &config, &settings, &mut acc);
        let freed = ctx.remove_path(&dir.path().join("not-there")).unwrap();
        assert_eq!(freed, 0);
        assert_eq!(ctx.freed_kb(), 0);
    }

    #[test]
    fn test_remove_file_credits_accountant() {
        let dir = tempfile::tempdir().unwrap();
        let (log, config, settings, mut acc) = fixtures(dir.path());
        let target = dir.path().join("big.bin");
        let mut f = std::fs::File::create(&target).unwrap();
        f.write_all(&vec![0u8; 8192]).unwrap();
        f.flush().unwrap();

        let mut ctx = OpContext::new(&log, &config, &settings, &mut acc);
        let freed = ctx.remove_path(&target).unwrap();
        assert_eq!(freed, 8);
        assert!(!target.exists());
        let (freed_total, warnings) = ctx.finish();
        assert_eq!(freed_total, 8);
        assert!(warnings.is_empty());
        assert_eq!(acc.total_kb(), 8);
    }

    #[test]
    fn test_remove_protected_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (log, config, settings, mut acc) = fixtures(dir.path());
        let mut ctx = OpContext::new(&log, &config, &settings, &mut acc);
        let err = ctx.remove_path(Path::new("/")).unwrap_err();
        assert!(matches!(err, MaintError::ProtectedPath { .. }));
    }

    #[test]
    fn test_clear_dir_keeps_the_dir() {
        let dir = tempfile::tempdir().unwrap();
        let (log, config, settings, mut acc) = fixtures(dir.path());
        let cache = dir.path().join("cache");
        std::fs::create_dir(&cache).unwrap();
        std::fs::write(cache.join("a.tmp"), vec![0u8; 2048]).unwrap();
        std::fs::create_dir(cache.join("sub")).unwrap();
        std::fs::write(cache.join("sub/b.tmp"), vec![0u8; 2048]).unwrap();

        let mut ctx = OpContext::new(&log, &config, &settings, &mut acc);
        let freed = ctx.clear_dir_contents(&cache).unwrap();
        assert_eq!(freed, 4);
        assert!(cache.exists());
        assert_eq!(std::fs::read_dir(&cache).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_command_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (log, config, settings, mut acc) = fixtures(dir.path());
        let mut ctx = OpContext::new(&log, &config, &settings, &mut acc);
        let err = ctx.run_command("false", &[]).unwrap_err();
        assert!(matches!(err, MaintError::CommandFailed { .. }));
    }

    #[test]
    fn test_ancillary_failure_becomes_warning() {
        let dir = tempfile::tempdir().unwrap();
        let (log, config, settings, mut acc) = fixtures(dir.path());
        let mut ctx = OpContext::new(&log, &config, &settings, &mut acc);
        assert!(!ctx.run_ancillary("false", &[]));
        let (_, warnings) = ctx.finish();
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_command_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let (log, config, settings, mut acc) = fixtures(dir.path());
        let mut ctx = OpContext::new(&log, &config, &settings, &mut acc);
        let out = ctx.run_command("echo", &["hello"]).unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn test_step_without_begin_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let (log, config, settings, mut acc) = fixtures(dir.path());
        let mut ctx = OpContext::new(&log, &config, &settings, &mut acc);
        ctx.step("orphan step");
        ctx.begin_steps(2);
        ctx.step("first");
        ctx.step("second");
    }

    #[test]
    fn test_auto_confirm_answers_sub_steps() {
        let dir = tempfile::tempdir().unwrap();
        let (log, mut config, settings, mut acc) = fixtures(dir.path());
        config.auto_confirm = true;
        let ctx = OpContext::new(&log, &config, &settings, &mut acc);
        assert!(ctx.confirm_step("wipe it all?"));
    }
}
