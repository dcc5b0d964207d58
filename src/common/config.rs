use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::registry::RiskLevel;

/// Orchestration options for a single run. Built once from CLI input,
/// immutable thereafter.
#[derive(Debug, Clone, Default)]
pub struct RunConfiguration {
    /// Raise log level to DEBUG
    pub verbose: bool,

    /// Answer yes to every confirmation gate without prompting
    pub auto_confirm: bool,

    /// Run exactly one operation
    pub single_operation: Option<String>,

    /// Keep only operations at this risk level
    pub risk_filter: Option<RiskLevel>,

    /// Operation ids to leave out
    pub skip_set: Vec<String>,

    /// ANSI rendering enabled
    pub color_enabled: bool,
}

/// Persistent macmaint settings (~/.macmaint/config.toml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Minimum free space on '/' required before a run may start, in GB
    #[serde(default = "default_min_free_gb")]
    pub min_free_gb: u64,

    /// Where report artifacts are written
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    /// Where run logs are written
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Seconds between privilege keep-alive refreshes
    #[serde(default = "default_sudo_refresh_secs")]
    pub sudo_refresh_secs: u64,

    /// Days after which diagnostic logs are considered stale
    #[serde(default = "default_log_stale_days")]
    pub log_stale_days: u32,
}

fn default_min_free_gb() -> u64 {
    5
}
fn default_report_dir() -> PathBuf {
    Settings::data_dir().join("reports")
}
fn default_log_dir() -> PathBuf {
    Settings::data_dir().join("logs")
}
fn default_sudo_refresh_secs() -> u64 {
    60
}
fn default_log_stale_days() -> u32 {
    7
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_free_gb: default_min_free_gb(),
            report_dir: default_report_dir(),
            log_dir: default_log_dir(),
            sudo_refresh_secs: default_sudo_refresh_secs(),
            log_stale_days: default_log_stale_days(),
        }
    }
}

impl Settings {
    /// Get the macmaint data directory (~/.macmaint)
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".macmaint")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Load settings from file, or defaults if not present
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from an explicit path (used by tests)
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let settings: Settings = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        let dir = path.parent().unwrap();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Create the report and log directories
    pub fn init_dirs(&self) -> Result<()> {
        for dir in [&self.report_dir, &self.log_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }
}
