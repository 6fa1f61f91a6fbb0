//! `carsync`: command-line client for rental vehicle telemetry.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `show` | Fetch and display the latest telemetry for a vehicle |
//! | `watch` | Continuously monitor a vehicle |
//! | `command` | Send a remote command |
//! | `config` | Manage CLI configuration |
//! | `completions` | Generate shell completions |
//!
//! # Configuration
//!
//! Settings live in `~/.config/carsync/config.toml` (or platform equivalent):
//! `service_url`, `refresh_interval`, `plate` and `no_color`. Command-line
//! flags win over `CARSYNC_URL` / `CARSYNC_PLATE`, which win over the file.

mod cli;
mod commands;
mod config;
mod format;
mod style;
mod util;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use time::UtcOffset;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::{ShowArgs, WatchArgs};
use crate::config::{Config, resolve_plate, resolve_url};
use crate::format::FormatOptions;
use crate::util::{build_client, build_engine, require_plate};

fn main() -> Result<()> {
    // The local offset cannot be read once other threads exist.
    let local_offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    run(local_offset)
}

#[tokio::main]
async fn run(local_offset: UtcOffset) -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "carsync", &mut io::stdout());
        return Ok(());
    }

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::load();
    let opts =
        FormatOptions::new(cli.no_color || config.no_color).with_utc_offset(local_offset);

    let Cli {
        quiet,
        url,
        demo,
        command,
        ..
    } = cli;

    match command {
        Commands::Show {
            plate,
            format,
            history,
            output,
        } => {
            let plate = require_plate(resolve_plate(plate.plate, &config))?;
            let client = build_client(&resolve_url(url, &config), demo)?;
            let engine = build_engine(
                client,
                Duration::from_secs(config.refresh_interval),
                local_offset,
            )?;
            commands::cmd_show(
                &engine,
                ShowArgs {
                    plate,
                    format,
                    history,
                    output: output.as_ref(),
                    quiet,
                    opts: &opts,
                },
            )
            .await?;
        }
        Commands::Watch {
            plate,
            interval,
            count,
        } => {
            let plate = require_plate(resolve_plate(plate.plate, &config))?;
            let interval = Duration::from_secs(interval.unwrap_or(config.refresh_interval));
            let client = build_client(&resolve_url(url, &config), demo)?;
            let engine = build_engine(client, interval, local_offset)?;
            commands::cmd_watch(
                &engine,
                WatchArgs {
                    plate,
                    interval,
                    count,
                    opts: &opts,
                },
            )
            .await?;
        }
        Commands::Command { plate, command } => {
            let client = build_client(&resolve_url(url, &config), demo)?;
            let engine = build_engine(
                client,
                Duration::from_secs(config.refresh_interval),
                local_offset,
            )?;
            commands::cmd_command(&engine, &plate, command, quiet, &opts).await?;
        }
        Commands::Config { action } => {
            commands::cmd_config(action, &opts)?;
        }
        Commands::Completions { .. } => {
            // Already handled above
        }
    }

    Ok(())
}
