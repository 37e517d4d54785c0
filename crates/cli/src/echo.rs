use std::collections::BTreeMap;

use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Ascension".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Character ascension stats to a flat dataset\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print the per-reason skip counts of a run
pub fn print_skip_tally(tally: &BTreeMap<&'static str, usize>) {
    if tally.is_empty() {
        return;
    }

    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Skipped Entities".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    for (kind, count) in tally {
        eprintln!("  {} {}", format!("{}:", kind).dimmed(), count.to_string().bright_white());
    }
    eprintln!();
}

/// Print timing information with color coding
pub fn print_timing(label: &str, duration: std::time::Duration) {
    let secs = duration.as_secs_f64();
    let indicator = if secs < 10.0 { "fast".green().to_string() } else { "slow".bright_yellow().to_string() };

    eprintln!("  {} {:>8.2}s ({})", format!("{}:", label).dimmed(), secs, indicator);
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
