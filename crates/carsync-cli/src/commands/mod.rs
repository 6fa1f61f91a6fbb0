//! Command implementations for the CLI.

mod command;
mod config;
mod show;
mod watch;

pub use command::cmd_command;
pub use config::cmd_config;
pub use show::{ShowArgs, cmd_show};
pub use watch::{WatchArgs, cmd_watch};
