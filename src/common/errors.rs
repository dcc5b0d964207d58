use std::path::PathBuf;

use thiserror::Error;

/// Typed errors for macmaint operations.
/// We use `anyhow` at the top level for CLI error handling,
/// but these typed errors allow modules to be precise about failures.
///
/// Severity model, never conflated:
/// - a *warning* is recorded on the active operation's outcome and the
///   operation continues;
/// - an *error* stops the active operation, the run continues with the next;
/// - a *fatal* error ([`MaintError::PreflightFailed`], invalid configuration)
///   aborts the run before any operation executes.
#[derive(Debug, Error)]
pub enum MaintError {
    /// Requested operation id is not in the registry
    #[error("unknown operation '{id}' (run 'macmaint --list' for the catalogue)")]
    UnknownOperation { id: String },

    /// Free-space preflight check failed; the run must not start
    #[error("preflight: only {available_gb:.1} GB free on '/', {needed_gb} GB required")]
    PreflightFailed { needed_gb: u64, available_gb: f64 },

    /// Configuration file is invalid
    #[error("config error in '{path}': {message}")]
    Config { path: PathBuf, message: String },

    /// File system operation failed
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external command exited unsuccessfully
    #[error("command '{program}' failed: {detail}")]
    CommandFailed { program: String, detail: String },

    /// A protected path was about to be touched
    #[error("refusing to touch protected path: '{path}'")]
    ProtectedPath { path: PathBuf },
}

impl MaintError {
    /// Wrap an I/O error with the path it occurred at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MaintError::Io {
            path: path.into(),
            source,
        }
    }
}
