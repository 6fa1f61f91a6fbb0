//! Visual styling utilities for the CLI.
//!
//! Spinners for network operations, colored status markers and table style.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use carsync_types::{IndoorComfort, OutdoorConditions};

/// Standard spinner tick characters (Braille dots animation)
const SPINNER_TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Standard spinner tick interval
const SPINNER_TICK_MS: u64 = 80;

/// Get the standard spinner style.
fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(SPINNER_TICK_CHARS)
}

/// Create a spinner for a network operation.
pub fn operation_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style());
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
    pb
}

/// Format a temperature, colored by comfort.
pub fn format_temp_colored(celsius: f64, comfortable: bool, no_color: bool) -> String {
    let formatted = format!("{:.1}°C", celsius);
    if no_color {
        formatted
    } else if comfortable {
        format!("{}", formatted.green())
    } else {
        format!("{}", formatted.cyan())
    }
}

/// Cabin comfort label.
pub fn format_indoor_comfort(comfort: IndoorComfort, no_color: bool) -> String {
    match (comfort, no_color) {
        (_, true) => comfort.to_string(),
        (IndoorComfort::Comfortable, false) => format!("{}", comfort.green()),
        (IndoorComfort::Cold, false) => format!("{}", comfort.cyan()),
    }
}

/// Outdoor conditions label.
pub fn format_outdoor_conditions(conditions: OutdoorConditions, no_color: bool) -> String {
    match (conditions, no_color) {
        (_, true) => conditions.to_string(),
        (OutdoorConditions::Mild, false) => format!("{}", conditions.green()),
        (OutdoorConditions::Cold, false) => format!("{}", conditions.cyan()),
    }
}

/// Format a success message.
pub fn format_success(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[OK] {}", message)
    } else {
        format!("{} {}", "[OK]".green(), message)
    }
}

/// Format a warning message.
pub fn format_warning(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[!!] {}", message)
    } else {
        format!("{} {}", "[!!]".yellow(), message)
    }
}

/// Format a bold title.
pub fn format_title(title: &str, no_color: bool) -> String {
    if no_color {
        title.to_string()
    } else {
        format!("{}", title.bold())
    }
}

/// Apply the table style.
pub fn apply_table_style(table: &mut tabled::Table, no_color: bool) {
    use tabled::settings::Style;
    if no_color {
        table.with(Style::ascii());
    } else {
        table.with(Style::rounded());
    }
}
