use std::io::Write;

use colored::*;

use crate::common::config::RunConfiguration;
use crate::logging::RunLog;
use crate::registry::{OperationDescriptor, RiskLevel};

/// Interpret a confirmation answer. An empty reply means yes; any reply
/// other than y/yes declines.
pub fn accepts(input: &str) -> bool {
    let trimmed = input.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("y")
        || trimmed.eq_ignore_ascii_case("yes")
}

fn read_answer(log: &RunLog, what: &str) -> bool {
    if std::io::stdout().flush().is_err() {
        log.warning("could not flush prompt, declining");
        return false;
    }

    let mut input = String::new();
    if std::io::stdin().read_line(&mut input).is_err() {
        log.warning(&format!("could not read answer for {}, declining", what));
        return false;
    }

    accepts(&input)
}

/// Ask the user whether one operation should run. This and the nested
/// [`confirm_step`] prompts are the only points where a run waits on the
/// terminal. `--yes` answers for every gate.
pub fn confirm(desc: &OperationDescriptor, config: &RunConfiguration, log: &RunLog) -> bool {
    if config.auto_confirm {
        log.debug(&format!("auto-confirmed '{}'", desc.id));
        return true;
    }

    match desc.risk {
        RiskLevel::High => {
            println!(
                "\n  {} {} is a {} operation: {}",
                "⚠️",
                desc.id.bold(),
                "HIGH RISK".red().bold(),
                desc.description
            );
            print!("  {} Run it anyway? [Y/n] ", "❓");
        }
        RiskLevel::Medium => {
            print!(
                "\n  {} Run {} ({})? {} [Y/n] ",
                "❓",
                desc.id.bold(),
                desc.description,
                "medium risk".yellow()
            );
        }
        RiskLevel::Low => {
            print!("\n  {} Run {} ({})? [Y/n] ", "❓", desc.id.bold(), desc.description);
        }
    }

    let answer = read_answer(log, &format!("'{}'", desc.id));
    if !answer {
        println!("  {} Skipped", "✗".red());
    }
    answer
}

/// Inner go/no-go for a destructive sub-step inside an already-confirmed
/// operation. Same auto-confirm and default-yes rules as the outer gate;
/// a decline skips the sub-step, not the operation.
pub fn confirm_step(prompt: &str, config: &RunConfiguration, log: &RunLog) -> bool {
    if config.auto_confirm {
        return true;
    }
    print!("  {} {} [Y/n] ", "❓", prompt);
    read_answer(log, "sub-step")
}
