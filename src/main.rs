use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use macmaint::cli::args::{Cli, CompletionShell};
use macmaint::cli::output;
use macmaint::common::config::{RunConfiguration, Settings};
use macmaint::common::errors::MaintError;
use macmaint::orchestrator;
use macmaint::registry::Registry;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("macmaint=debug")
            .init();
    }

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("  {} {:#}", "✗".red(), e);
            // Unknown-operation is a usage error; everything else that
            // reaches here aborted the run before any operation executed
            match e.downcast_ref::<MaintError>() {
                Some(MaintError::UnknownOperation { .. }) => ExitCode::from(2),
                _ => ExitCode::from(1),
            }
        }
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    if let Some(shell) = cli.completions {
        use clap::CommandFactory;
        let mut cmd = Cli::command();
        let shell = match shell {
            CompletionShell::Bash => clap_complete::Shell::Bash,
            CompletionShell::Zsh => clap_complete::Shell::Zsh,
            CompletionShell::Fish => clap_complete::Shell::Fish,
        };
        clap_complete::generate(shell, &mut cmd, "macmaint", &mut std::io::stdout());
        return Ok(());
    }

    if cli.list {
        output::print_registry(&Registry::new(), &cli.format);
        return Ok(());
    }

    let mut settings = Settings::load()?;
    if let Some(min_free_gb) = cli.min_free_gb {
        settings.min_free_gb = min_free_gb;
    }
    if let Some(ref report_dir) = cli.report_dir {
        settings.report_dir = report_dir.clone();
    }

    let config = RunConfiguration {
        verbose: cli.verbose,
        auto_confirm: cli.yes,
        single_operation: cli.operation.clone(),
        risk_filter: cli.only_risk.map(Into::into),
        skip_set: cli.skip.clone(),
        color_enabled: !cli.no_color,
    };

    // Per-operation failures live inside the summary; the run itself
    // succeeded if we got this far
    let summary = orchestrator::run(config, settings)?;
    output::print_run_summary(&summary, &cli.format);
    Ok(())
}
