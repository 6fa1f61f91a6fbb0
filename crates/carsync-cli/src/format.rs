//! Output formatting utilities for text and JSON output.

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use carsync_core::{SyncState, SyncStatus};
use carsync_types::{GpsPosition, IndoorComfort, OutdoorConditions, TimeSeriesPoint, VehicleSnapshot};

use crate::style;

/// Formatting options for output.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
    /// Offset timestamps are shown at.
    pub utc_offset: UtcOffset,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self::new(false)
    }
}

impl FormatOptions {
    pub fn new(no_color: bool) -> Self {
        Self {
            no_color,
            compact: false,
            utc_offset: UtcOffset::UTC,
        }
    }

    #[must_use]
    pub fn with_utc_offset(mut self, offset: UtcOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    /// Serialize value to JSON string, respecting compact option.
    pub fn as_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }
}

/// GPS position for display; `unknown` when the vehicle reported none.
pub fn format_gps(gps: Option<&GpsPosition>) -> String {
    gps.map_or_else(|| "unknown".to_string(), GpsPosition::to_string)
}

/// `YYYY-MM-DD HH:MM` as seen at `offset`.
pub fn format_timestamp(at: OffsetDateTime, offset: UtcOffset) -> String {
    at.to_offset(offset)
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .unwrap_or_else(|_| at.to_string())
}

/// Multi-line description of a snapshot.
#[must_use]
pub fn format_snapshot_text(snapshot: &VehicleSnapshot, opts: &FormatOptions) -> String {
    let no_color = opts.no_color;
    let indoor = snapshot.indoor_comfort();
    let outdoor = snapshot.outdoor_conditions();

    let mut out = String::new();
    out.push_str(&style::format_title(
        &format!("Vehicle {}", snapshot.license_plate),
        no_color,
    ));
    out.push('\n');
    out.push_str(&format!("  {:<13}{}\n", "Owner", snapshot.owner));
    out.push_str(&format!(
        "  {:<13}{}  {}\n",
        "Cabin",
        style::format_temp_colored(
            snapshot.indoor_temp,
            indoor == IndoorComfort::Comfortable,
            no_color
        ),
        style::format_indoor_comfort(indoor, no_color)
    ));
    out.push_str(&format!(
        "  {:<13}{}  {}\n",
        "Outside",
        style::format_temp_colored(
            snapshot.outdoor_temp,
            outdoor == OutdoorConditions::Mild,
            no_color
        ),
        style::format_outdoor_conditions(outdoor, no_color)
    ));
    out.push_str(&format!(
        "  {:<13}{}\n",
        "Location",
        format_gps(snapshot.gps.as_ref())
    ));
    out.push_str(&format!("  {:<13}{}\n", "Last service", snapshot.last_service));
    out.push_str(&format!(
        "  {:<13}{}\n",
        "Updated",
        format_timestamp(snapshot.last_updated, opts.utc_offset)
    ));
    out
}

/// Table of the derived 24-hour series.
#[must_use]
pub fn format_series_table(series: &[TimeSeriesPoint], opts: &FormatOptions) -> String {
    use tabled::{Table, Tabled};

    if series.is_empty() {
        return "No series available.\n".to_string();
    }

    #[derive(Tabled)]
    struct SeriesRow {
        #[tabled(rename = "Time")]
        time: String,
        #[tabled(rename = "Cabin")]
        indoor: String,
        #[tabled(rename = "Outside")]
        outdoor: String,
    }

    let rows: Vec<SeriesRow> = series
        .iter()
        .map(|p| SeriesRow {
            time: p.time_label.clone(),
            indoor: format!("{:.1}°C", p.indoor),
            outdoor: format!("{:.1}°C", p.outdoor),
        })
        .collect();

    let mut table = Table::new(rows);
    style::apply_table_style(&mut table, opts.no_color);

    let note = if opts.no_color {
        "Simulated from the latest reading".to_string()
    } else {
        format!("{}", "Simulated from the latest reading".dimmed())
    };
    format!("{}\n{}\n", table, note)
}

/// JSON shape printed by `show --format json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotReport<'a> {
    #[serde(flatten)]
    pub snapshot: &'a VehicleSnapshot,
    pub indoor_comfort: IndoorComfort,
    pub outdoor_conditions: OutdoorConditions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<&'a [TimeSeriesPoint]>,
}

impl<'a> SnapshotReport<'a> {
    pub fn new(snapshot: &'a VehicleSnapshot, series: Option<&'a [TimeSeriesPoint]>) -> Self {
        Self {
            snapshot,
            indoor_comfort: snapshot.indoor_comfort(),
            outdoor_conditions: snapshot.outdoor_conditions(),
            series,
        }
    }
}

/// One line of `watch` output for a settled state.
///
/// A failed refresh that kept the previous snapshot is marked `(stale)`.
#[must_use]
pub fn format_watch_line(state: &SyncState, opts: &FormatOptions) -> String {
    let no_color = opts.no_color;
    let now = format_timestamp(OffsetDateTime::now_utc(), opts.utc_offset);
    let time = if no_color {
        format!("[{}]", now)
    } else {
        format!("{}", format!("[{}]", now).dimmed())
    };

    match (&state.snapshot, state.status) {
        (Some(snapshot), status) => {
            let readings = format!(
                "cabin {}  outside {}  gps {}",
                style::format_temp_colored(
                    snapshot.indoor_temp,
                    snapshot.indoor_comfort() == IndoorComfort::Comfortable,
                    no_color
                ),
                style::format_temp_colored(
                    snapshot.outdoor_temp,
                    snapshot.outdoor_conditions() == OutdoorConditions::Mild,
                    no_color
                ),
                format_gps(snapshot.gps.as_ref())
            );
            if status == SyncStatus::Error {
                let reason = state.error_message.as_deref().unwrap_or("refresh failed");
                let marker = if no_color {
                    "(stale)".to_string()
                } else {
                    format!("{}", "(stale)".yellow())
                };
                format!("{} {} {} {}", time, readings, marker, reason)
            } else {
                format!("{} {}", time, readings)
            }
        }
        (None, _) => {
            let reason = state.error_message.as_deref().unwrap_or("no data");
            format!("{} {}", time, style::format_warning(reason, no_color))
        }
    }
}
