//! Remote command implementation.

use anyhow::{Context, Result};
use carsync_core::SyncEngine;
use carsync_types::VehicleCommand;

use crate::format::FormatOptions;
use crate::style;

pub async fn cmd_command(
    engine: &SyncEngine,
    plate: &str,
    command: VehicleCommand,
    quiet: bool,
    opts: &FormatOptions,
) -> Result<()> {
    let spinner = (!quiet).then(|| {
        style::operation_spinner(&format!("Sending {} to {}...", command.label(), plate))
    });

    let result = engine.send_command(plate, command).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if let Err(err) = result {
        let message = err.user_message();
        return Err(err).context(message);
    }

    println!(
        "{}",
        style::format_success(
            &format!("{} command sent to {}", command.label(), plate),
            opts.no_color
        )
    );
    Ok(())
}
