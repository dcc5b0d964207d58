use colored::*;

use crate::registry::RiskLevel;

/// Format a kilobyte count into a human-readable size string.
/// The accountant tracks kilobytes internally; conversion to larger
/// units happens only here, at render time.
pub fn format_kb(kb: u64) -> String {
    const MB: u64 = 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if kb >= TB {
        format!("{:.2} TB", kb as f64 / TB as f64)
    } else if kb >= GB {
        format!("{:.2} GB", kb as f64 / GB as f64)
    } else if kb >= MB {
        format!("{:.2} MB", kb as f64 / MB as f64)
    } else {
        format!("{} KB", kb)
    }
}

/// Format size with color based on magnitude
pub fn format_kb_colored(kb: u64) -> ColoredString {
    let s = format_kb(kb);
    const GB: u64 = 1024 * 1024;
    const MB100: u64 = 100 * 1024;

    if kb >= GB {
        s.green().bold()
    } else if kb >= MB100 {
        s.green()
    } else {
        s.white()
    }
}

/// Format duration in human-readable form
pub fn format_duration(secs: f64) -> String {
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{}m {:.0}s", mins, remaining)
    }
}

/// Colorize a risk level
pub fn format_risk(risk: RiskLevel) -> ColoredString {
    match risk {
        RiskLevel::Low => "LOW".green(),
        RiskLevel::Medium => "MEDIUM".yellow(),
        RiskLevel::High => "HIGH".red().bold(),
    }
}

/// Print a section header
pub fn print_header(title: &str) {
    println!();
    println!("{}", title.bold().underline());
    println!();
}
