//! Watch command implementation.
//!
//! Fetches once, then lets the engine's auto-refresh drive updates. Every
//! settled state change prints one line; a failed refresh keeps the last
//! good readings on screen marked as stale.

use std::time::Duration;

use anyhow::{Result, bail};
use carsync_core::SyncEngine;
use owo_colors::OwoColorize;

use crate::format::{FormatOptions, format_watch_line};

/// Arguments for the watch command.
pub struct WatchArgs<'a> {
    pub plate: String,
    pub interval: Duration,
    pub count: u32,
    pub opts: &'a FormatOptions,
}

pub async fn cmd_watch(engine: &SyncEngine, args: WatchArgs<'_>) -> Result<()> {
    let WatchArgs {
        plate,
        interval,
        count,
        opts,
    } = args;

    let mut updates = engine.subscribe();
    engine.fetch(&plate).await?;

    let state = updates.borrow_and_update().clone();
    println!("{}", format_watch_line(&state, opts));
    if !state.has_snapshot() {
        bail!(
            "{}",
            state
                .error_message
                .as_deref()
                .unwrap_or("Failed to fetch car data.")
        );
    }

    let header = if opts.no_color {
        format!("Watching: {}", plate)
    } else {
        format!("Watching: {}", plate.cyan())
    };
    eprintln!("{}", header);
    if count > 0 {
        eprintln!(
            "Interval: {}s | Count: {} | Press Ctrl+C to stop",
            interval.as_secs(),
            count
        );
    } else {
        eprintln!("Interval: {}s | Press Ctrl+C to stop", interval.as_secs());
    }
    eprintln!("{}", "-".repeat(50));

    engine.start_auto_refresh(interval);
    let mut printed: u32 = 1;

    loop {
        if count > 0 && printed >= count {
            eprintln!("Completed {} updates.", printed);
            break;
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nShutting down...");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if state.is_loading() {
                    continue;
                }
                println!("{}", format_watch_line(&state, opts));
                printed += 1;
                if !state.has_snapshot() {
                    engine.shutdown();
                    bail!("Lost track of {}", plate);
                }
            }
        }
    }

    engine.shutdown();
    Ok(())
}
