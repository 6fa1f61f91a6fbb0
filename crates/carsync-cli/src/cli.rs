//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use carsync_types::VehicleCommand;

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Reusable vehicle selection arguments
#[derive(Debug, Clone, Args)]
pub struct PlateArgs {
    /// License plate, or use CARSYNC_PLATE env var / the configured default
    #[arg(env = "CARSYNC_PLATE")]
    pub plate: Option<String>,
}

#[derive(Parser)]
#[command(name = "carsync")]
#[command(author, version, about = "CLI for rental vehicle telemetry", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Telemetry service URL (overrides config)
    #[arg(long, global = true, env = "CARSYNC_URL")]
    pub url: Option<String>,

    /// Use built-in sample vehicles instead of a telemetry service
    #[arg(long, global = true)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and display the latest telemetry for a vehicle
    Show {
        #[command(flatten)]
        plate: PlateArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Include the derived 24-hour temperature series
        #[arg(long)]
        history: bool,

        /// Write output to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Continuously monitor a vehicle
    Watch {
        #[command(flatten)]
        plate: PlateArgs,

        /// Refresh interval in seconds (overrides config)
        #[arg(short, long, value_parser = parse_interval)]
        interval: Option<u64>,

        /// Number of updates to print before exiting (0 for unlimited)
        #[arg(short = 'n', long, default_value = "0")]
        count: u32,
    },

    /// Send a remote command to a vehicle
    Command {
        /// License plate of the target vehicle
        plate: String,

        /// Command to send (start-heating, service-mode)
        #[arg(value_parser = parse_command)]
        command: VehicleCommand,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Parse a refresh interval, rejecting zero
fn parse_interval(s: &str) -> Result<u64, String> {
    let secs: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if secs == 0 {
        return Err("Interval must be at least 1 second".to_string());
    }
    Ok(secs)
}

/// Parse a vehicle command name
fn parse_command(s: &str) -> Result<VehicleCommand, String> {
    s.parse::<VehicleCommand>().map_err(|_| {
        let valid: Vec<_> = VehicleCommand::ALL
            .iter()
            .map(|c| c.as_str().replace('_', "-"))
            .collect();
        format!("Unknown command '{}'. Valid commands: {}", s, valid.join(", "))
    })
}

/// Parse boolean argument with flexible input
pub fn parse_bool_arg(s: &str) -> Result<bool, String> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" | "enable" | "enabled" => Ok(true),
        "false" | "no" | "off" | "0" | "disable" | "disabled" => Ok(false),
        _ => Err(format!(
            "Invalid boolean value '{}'. Use: true/false, yes/no, on/off, 1/0",
            s
        )),
    }
}

/// Configuration keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    /// Telemetry service URL
    ServiceUrl,
    /// Auto-refresh interval in seconds
    RefreshInterval,
    /// Default license plate
    Plate,
    /// Disable colored output
    NoColor,
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
        /// Configuration value
        value: String,
    },

    /// Unset (reset) a configuration value
    Unset {
        /// Configuration key to reset
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval("30"), Ok(30));
        assert!(parse_interval("0").is_err());
        assert!(parse_interval("abc").is_err());
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("start-heating"), Ok(VehicleCommand::StartHeating));
        assert_eq!(parse_command("service_mode"), Ok(VehicleCommand::ServiceMode));
        let err = parse_command("honk").unwrap_err();
        assert!(err.contains("start-heating"));
        assert!(err.contains("service-mode"));
    }

    #[test]
    fn test_parse_bool_arg() {
        assert_eq!(parse_bool_arg("yes"), Ok(true));
        assert_eq!(parse_bool_arg("OFF"), Ok(false));
        assert!(parse_bool_arg("maybe").is_err());
    }

    #[test]
    fn test_show_args() {
        let cli = Cli::try_parse_from(["carsync", "--demo", "show", "ABC-123", "--format", "json"])
            .unwrap();
        assert!(cli.demo);
        match cli.command {
            Commands::Show { plate, format, history, .. } => {
                assert_eq!(plate.plate.as_deref(), Some("ABC-123"));
                assert_eq!(format, OutputFormat::Json);
                assert!(!history);
            }
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn test_command_args() {
        let cli = Cli::try_parse_from(["carsync", "command", "ABC-123", "start-heating"]).unwrap();
        match cli.command {
            Commands::Command { plate, command } => {
                assert_eq!(plate, "ABC-123");
                assert_eq!(command, VehicleCommand::StartHeating);
            }
            _ => panic!("expected command"),
        }
    }

    #[test]
    fn test_watch_rejects_zero_interval() {
        let result = Cli::try_parse_from(["carsync", "watch", "ABC-123", "--interval", "0"]);
        assert!(result.is_err());
    }
}
