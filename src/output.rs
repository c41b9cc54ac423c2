use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use serde::Serialize;

/// Global output settings
static OUTPUT_JSON: AtomicBool = AtomicBool::new(false);
static QUIET: AtomicBool = AtomicBool::new(false);

pub fn set_json_output(json: bool) {
    OUTPUT_JSON.store(json, Ordering::Relaxed);
}

pub fn is_json_output() -> bool {
    OUTPUT_JSON.load(Ordering::Relaxed)
}

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Print a single item or JSON depending on output mode
pub fn print_item<T: Serialize>(item: &T, display: impl FnOnce(&T)) {
    if is_json_output() {
        println!("{}", serde_json::to_string_pretty(item).unwrap_or_default());
    } else {
        display(item);
    }
}

/// Print a status message (skipped when quiet or in JSON mode)
pub fn print_message(message: &str) {
    if is_quiet() || is_json_output() {
        return;
    }
    println!("{message}");
}

/// Print a failure notice that doesn't abort the session
pub fn print_warning(message: &str) {
    eprintln!("{} {message}", "!".yellow().bold());
}

/// Format character status with color
pub fn status_colored(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "alive" => status.green().to_string(),
        "dead" => status.red().to_string(),
        "unknown" => status.bright_black().to_string(),
        _ => status.to_string(),
    }
}

/// Format a date string as date only
pub fn format_date_only(iso: &str) -> String {
    use chrono::{DateTime, Utc};

    if let Ok(dt) = iso.parse::<DateTime<Utc>>() {
        dt.format("%Y-%m-%d").to_string()
    } else {
        iso.split('T').next().unwrap_or(iso).to_string()
    }
}

/// Truncate a string with ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
