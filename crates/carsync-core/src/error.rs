//! Error types for carsync-core.
//!
//! This module defines all error types that can occur when fetching vehicle
//! telemetry or dispatching remote commands.
//!
//! # Where Errors Surface
//!
//! Read failures never escape [`crate::SyncEngine::fetch`] as `Err`: they are
//! converted into the `Error` status of [`crate::SyncState`] together with a
//! human-readable message (see [`Error::user_message`]). Only input validation
//! is returned directly to the caller.
//!
//! | Error Type | Raised by | Surfaces as |
//! |------------|-----------|-------------|
//! | [`Error::InvalidInput`] | `fetch`, `send_command` | `Err` to the caller, state untouched |
//! | [`Error::NotFound`] | `RemoteClient::get_snapshot` | `SyncStatus::Error` |
//! | [`Error::RequestFailed`] | `RemoteClient::get_snapshot` | `SyncStatus::Error` |
//! | [`Error::Timeout`] | `RemoteClient::get_snapshot` | `SyncStatus::Error` |
//! | [`Error::CommandFailed`] | `RemoteClient::send_command` | `Err` to the caller, state untouched |
//! | [`Error::InvalidConfig`] | client and options constructors | `Err` to the caller |
//!
//! ## Retrying
//!
//! The engine never retries. A caller that wants another attempt simply calls
//! `fetch` or `refresh` again, or relies on auto-refresh.

use std::time::Duration;

use thiserror::Error;

use carsync_types::{ParseError, VehicleCommand};

/// Errors that can occur in the telemetry sync engine.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    /// Input rejected before any network call.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The telemetry service does not know this vehicle.
    #[error("Vehicle '{plate}' not found")]
    NotFound {
        /// The plate that was requested.
        plate: String,
    },

    /// Reading the snapshot failed (transport error, non-2xx, malformed body).
    #[error("Request for '{plate}' failed: {reason}")]
    RequestFailed {
        /// The plate that was requested.
        plate: String,
        /// What went wrong.
        reason: String,
    },

    /// Sending a command failed (transport error or non-2xx).
    #[error("Command '{command}' for '{plate}' failed: {reason}")]
    CommandFailed {
        /// The target vehicle.
        plate: String,
        /// The command that was sent.
        command: VehicleCommand,
        /// What went wrong.
        reason: String,
    },

    /// Operation did not complete in time.
    #[error("Operation '{operation}' timed out after {duration:?}")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// The timeout duration.
        duration: Duration,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a not found error for a plate.
    pub fn not_found(plate: impl Into<String>) -> Self {
        Self::NotFound {
            plate: plate.into(),
        }
    }

    /// Create a read failure.
    pub fn request_failed(plate: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RequestFailed {
            plate: plate.into(),
            reason: reason.into(),
        }
    }

    /// Create a command failure.
    pub fn command_failed(
        plate: impl Into<String>,
        command: VehicleCommand,
        reason: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            plate: plate.into(),
            command,
            reason: reason.into(),
        }
    }

    /// Create a timeout error with operation context.
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Message suitable for showing to an end user.
    ///
    /// This is what the engine stores in `SyncState::error_message`.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { plate } => format!(
                "No vehicle found for license plate '{}'. Check the plate and try again.",
                plate
            ),
            Self::RequestFailed { .. } | Self::Timeout { .. } => {
                "Failed to fetch car data. Please check the license plate and server connection."
                    .to_string()
            }
            Self::CommandFailed { command, .. } => {
                format!("Failed to send {} command", command.label().to_lowercase())
            }
            other => other.to_string(),
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::BlankPlate => Error::InvalidInput("license plate must not be blank".into()),
            ParseError::UnknownCommand(name) => {
                Error::InvalidInput(format!("unknown command '{}'", name))
            }
            // Handle future ParseError variants (non_exhaustive)
            other => Error::InvalidInput(other.to_string()),
        }
    }
}

/// Result type alias using carsync-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("ABC-123");
        assert_eq!(err.to_string(), "Vehicle 'ABC-123' not found");

        let err = Error::request_failed("ABC-123", "connection refused");
        assert!(err.to_string().contains("ABC-123"));
        assert!(err.to_string().contains("connection refused"));

        let err = Error::command_failed("ABC-123", VehicleCommand::StartHeating, "HTTP 500");
        assert!(err.to_string().contains("start_heating"));
        assert!(err.to_string().contains("HTTP 500"));

        let err = Error::timeout("get_snapshot", Duration::from_secs(10));
        assert!(err.to_string().contains("get_snapshot"));
        assert!(err.to_string().contains("10s"));
    }

    #[test]
    fn test_user_messages() {
        let msg = Error::not_found("ABC-123").user_message();
        assert!(msg.contains("ABC-123"));

        let msg = Error::request_failed("ABC-123", "boom").user_message();
        assert!(msg.starts_with("Failed to fetch car data"));

        let msg =
            Error::command_failed("ABC-123", VehicleCommand::StartHeating, "x").user_message();
        assert_eq!(msg, "Failed to send start heating command");

        let msg = Error::invalid_input("blank").user_message();
        assert_eq!(msg, "Invalid input: blank");
    }

    #[test]
    fn test_parse_error_conversion() {
        let err: Error = ParseError::BlankPlate.into();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err: Error = ParseError::UnknownCommand("warp".into()).into();
        assert!(err.to_string().contains("warp"));
    }
}
