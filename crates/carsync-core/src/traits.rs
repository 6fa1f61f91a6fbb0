//! Trait abstractions for the telemetry service.
//!
//! This module provides the [`RemoteClient`] trait that abstracts over the
//! real HTTP client and the mock client used in tests and demos.

use async_trait::async_trait;

use carsync_types::{VehicleCommand, VehicleSnapshot};

use crate::error::Result;

/// The two network calls the sync engine depends on.
///
/// Implementations report failures as [`crate::Error`] values and must not
/// panic on transport problems: the engine converts every failure into state.
///
/// # Example
///
/// ```ignore
/// use carsync_core::{RemoteClient, Result};
///
/// async fn print_owner<C: RemoteClient>(client: &C) -> Result<()> {
///     let snapshot = client.get_snapshot("ABC-123").await?;
///     println!("Owner: {}", snapshot.owner);
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Read the current snapshot for a vehicle.
    ///
    /// Exactly one round trip; no retries.
    async fn get_snapshot(&self, plate: &str) -> Result<VehicleSnapshot>;

    /// Ask the telemetry service to execute a command on a vehicle.
    ///
    /// The response body is not consumed; success means the service
    /// accepted the command.
    async fn send_command(&self, plate: &str, command: VehicleCommand) -> Result<()>;
}
