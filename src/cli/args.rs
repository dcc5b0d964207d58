use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::registry::RiskLevel;

/// macmaint — risk-aware macOS maintenance with auditable reports
#[derive(Parser, Debug)]
#[command(
    name = "macmaint",
    version,
    about = "A risk-aware macOS maintenance orchestrator",
    long_about = "macmaint runs a fixed catalogue of macOS maintenance operations —\n\
                   cache pruning, index rebuilds, database vacuums, network resets —\n\
                   with per-operation confirmation, risk filtering, and a dual-format\n\
                   report of everything that happened.",
    after_help = "EXAMPLES:\n  \
        macmaint                               Run the full catalogue, confirming each step\n  \
        macmaint --yes                         Run everything unattended\n  \
        macmaint --list                        Show the operation catalogue\n  \
        macmaint --operation dns-flush         Run a single operation\n  \
        macmaint --only-risk low --yes         Unattended low-risk pass\n  \
        macmaint --skip network-reset --yes    Everything except the network reset\n  \
        macmaint --list --format json          Catalogue as JSON"
)]
pub struct Cli {
    /// Answer yes to every confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Verbose output (DEBUG lines reach the console)
    #[arg(long, short)]
    pub verbose: bool,

    /// Run exactly one operation by id
    #[arg(long, value_name = "ID")]
    pub operation: Option<String>,

    /// Only run operations at this risk level
    #[arg(long, value_name = "LEVEL")]
    pub only_risk: Option<RiskArg>,

    /// Skip an operation by id (repeatable)
    #[arg(long, value_name = "ID")]
    pub skip: Vec<String>,

    /// Print the operation catalogue and exit
    #[arg(long)]
    pub list: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Output format for --list and the end-of-run summary
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,

    /// Minimum free space on '/' required to start, in GB
    #[arg(long, value_name = "GB")]
    pub min_free_gb: Option<u64>,

    /// Directory for report artifacts
    #[arg(long, value_name = "PATH")]
    pub report_dir: Option<PathBuf>,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<CompletionShell>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// CLI-facing mirror of [`RiskLevel`] so clap can parse and list values
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RiskArg {
    Low,
    Medium,
    High,
}

impl From<RiskArg> for RiskLevel {
    fn from(arg: RiskArg) -> Self {
        match arg {
            RiskArg::Low => RiskLevel::Low,
            RiskArg::Medium => RiskLevel::Medium,
            RiskArg::High => RiskLevel::High,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
