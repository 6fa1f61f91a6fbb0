//! Show command implementation.

use std::path::PathBuf;

use anyhow::{Result, bail};
use carsync_core::{SyncEngine, SyncStatus};

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, SnapshotReport, format_series_table, format_snapshot_text};
use crate::style;
use crate::util::write_output;

/// Arguments for the show command.
pub struct ShowArgs<'a> {
    pub plate: String,
    pub format: OutputFormat,
    pub history: bool,
    pub output: Option<&'a PathBuf>,
    pub quiet: bool,
    pub opts: &'a FormatOptions,
}

pub async fn cmd_show(engine: &SyncEngine, args: ShowArgs<'_>) -> Result<()> {
    let ShowArgs {
        plate,
        format,
        history,
        output,
        quiet,
        opts,
    } = args;

    let spinner = (!quiet && format == OutputFormat::Text)
        .then(|| style::operation_spinner(&format!("Fetching {}...", plate)));

    let outcome = engine.fetch(&plate).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    outcome?;

    let state = engine.state();
    let snapshot = match (&state.snapshot, state.status) {
        (Some(snapshot), SyncStatus::Ready) => snapshot,
        _ => bail!(
            "{}",
            state
                .error_message
                .as_deref()
                .unwrap_or("Failed to fetch car data.")
        ),
    };

    let content = match format {
        OutputFormat::Json => {
            let series = history.then_some(state.series.as_slice());
            opts.as_json(&SnapshotReport::new(snapshot, series))?
        }
        OutputFormat::Text => {
            let mut text = format_snapshot_text(snapshot, opts);
            if history {
                text.push('\n');
                text.push_str(&format_series_table(&state.series, opts));
            }
            text
        }
    };

    write_output(output, &content)
}
