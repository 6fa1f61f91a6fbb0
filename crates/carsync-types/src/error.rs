//! Error types for data parsing in carsync-types.

use thiserror::Error;

/// Errors that can occur when parsing or validating vehicle telemetry data.
///
/// This error type is transport-agnostic and does not include
/// network errors (those belong in carsync-core).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// License plate was empty or contained only whitespace.
    #[error("License plate must not be blank")]
    BlankPlate,

    /// Command name is not one of the known vehicle commands.
    #[error("Unknown vehicle command: {0}")]
    UnknownCommand(String),
}

/// Result type alias using carsync-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
