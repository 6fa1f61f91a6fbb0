//! Mock telemetry client for testing.
//!
//! This module provides a mock client that can be used for unit testing
//! and demos without a running telemetry service.
//!
//! The [`MockRemoteClient`] implements the [`RemoteClient`] trait, allowing it
//! to be used interchangeably with the HTTP client.
//!
//! # Features
//!
//! - **Failure injection**: Fail reads permanently or for the next N calls
//! - **Latency simulation**: Delay responses, globally or per plate
//! - **Call accounting**: Count reads and commands, record sent commands

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use carsync_types::{VehicleCommand, VehicleSnapshot};

use crate::error::{Error, Result};
use crate::traits::RemoteClient;

/// A mock telemetry service.
///
/// # Example
///
/// ```
/// use carsync_core::{MockRemoteClient, RemoteClient};
/// use carsync_types::VehicleSnapshot;
///
/// #[tokio::main]
/// async fn main() {
///     let client = MockRemoteClient::builder()
///         .snapshot(VehicleSnapshot::builder("ABC-123").indoor_temp(21.0).build())
///         .build();
///
///     let snapshot = client.get_snapshot("ABC-123").await.unwrap();
///     assert_eq!(snapshot.indoor_temp, 21.0);
///     assert_eq!(client.read_count(), 1);
/// }
/// ```
pub struct MockRemoteClient {
    snapshots: RwLock<HashMap<String, VehicleSnapshot>>,
    plate_latency: RwLock<HashMap<String, Duration>>,
    /// Simulated read latency in milliseconds (0 = no delay).
    read_latency_ms: AtomicU64,
    /// Simulated command latency in milliseconds (0 = no delay).
    command_latency_ms: AtomicU64,
    should_fail: AtomicBool,
    fail_message: RwLock<String>,
    /// Number of reads to fail before succeeding again.
    remaining_failures: AtomicU32,
    commands_should_fail: AtomicBool,
    read_count: AtomicU32,
    command_count: AtomicU32,
    sent_commands: RwLock<Vec<(String, VehicleCommand)>>,
}

impl std::fmt::Debug for MockRemoteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRemoteClient")
            .field("read_count", &self.read_count.load(Ordering::Relaxed))
            .field("command_count", &self.command_count.load(Ordering::Relaxed))
            .field("should_fail", &self.should_fail.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for MockRemoteClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRemoteClient {
    /// Create an empty mock: every plate is unknown.
    pub fn new() -> Self {
        Self::from_snapshots(HashMap::new())
    }

    /// Create a builder.
    pub fn builder() -> MockRemoteClientBuilder {
        MockRemoteClientBuilder::default()
    }

    /// A mock pre-loaded with a few sample vehicles.
    pub fn demo() -> Self {
        let now = OffsetDateTime::now_utc();
        Self::builder()
            .snapshot(
                VehicleSnapshot::builder("ABC-123")
                    .outdoor_temp(12.5)
                    .indoor_temp(21.0)
                    .gps(59.436962, 24.753574)
                    .owner("John Smith")
                    .last_service("2024-01-15")
                    .last_updated(now)
                    .build(),
            )
            .snapshot(
                VehicleSnapshot::builder("XYZ-789")
                    .outdoor_temp(18.2)
                    .indoor_temp(17.5)
                    .gps(60.169857, 24.938379)
                    .owner("Jane Doe")
                    .last_service("2023-11-02")
                    .last_updated(now)
                    .build(),
            )
            .snapshot(
                VehicleSnapshot::builder("DEF-456")
                    .outdoor_temp(-4.0)
                    .indoor_temp(3.5)
                    .owner("Fleet Pool")
                    .last_service("2024-03-28")
                    .last_updated(now)
                    .build(),
            )
            .build()
    }

    fn from_snapshots(snapshots: HashMap<String, VehicleSnapshot>) -> Self {
        Self {
            snapshots: RwLock::new(snapshots),
            plate_latency: RwLock::new(HashMap::new()),
            read_latency_ms: AtomicU64::new(0),
            command_latency_ms: AtomicU64::new(0),
            should_fail: AtomicBool::new(false),
            fail_message: RwLock::new("Mock failure".to_string()),
            remaining_failures: AtomicU32::new(0),
            commands_should_fail: AtomicBool::new(false),
            read_count: AtomicU32::new(0),
            command_count: AtomicU32::new(0),
            sent_commands: RwLock::new(Vec::new()),
        }
    }

    /// Insert or replace the snapshot served for its plate.
    pub async fn set_snapshot(&self, snapshot: VehicleSnapshot) {
        self.snapshots
            .write()
            .await
            .insert(snapshot.license_plate.clone(), snapshot);
    }

    /// Forget a plate; later reads for it return `NotFound`.
    pub async fn remove_snapshot(&self, plate: &str) {
        self.snapshots.write().await.remove(plate);
    }

    /// Make every read fail (or stop failing).
    pub async fn set_should_fail(&self, fail: bool, message: Option<&str>) {
        self.should_fail.store(fail, Ordering::Relaxed);
        if let Some(msg) = message {
            *self.fail_message.write().await = msg.to_string();
        }
    }

    /// Fail the next `count` reads, then succeed again.
    ///
    /// Useful for exercising stale-on-failure behavior.
    pub fn fail_next(&self, count: u32) {
        self.remaining_failures.store(count, Ordering::Relaxed);
    }

    /// Make every command fail (or stop failing).
    pub fn set_commands_should_fail(&self, fail: bool) {
        self.commands_should_fail.store(fail, Ordering::Relaxed);
    }

    /// Delay every read by `latency`.
    pub fn set_read_latency(&self, latency: Duration) {
        self.read_latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Delay reads for one plate, overriding the global read latency.
    pub async fn set_plate_latency(&self, plate: &str, latency: Duration) {
        self.plate_latency
            .write()
            .await
            .insert(plate.to_string(), latency);
    }

    /// Delay every command by `latency`.
    pub fn set_command_latency(&self, latency: Duration) {
        self.command_latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Number of reads issued so far, successful or not.
    pub fn read_count(&self) -> u32 {
        self.read_count.load(Ordering::Relaxed)
    }

    /// Number of commands issued so far, successful or not.
    pub fn command_count(&self) -> u32 {
        self.command_count.load(Ordering::Relaxed)
    }

    /// Commands issued so far, in order.
    pub async fn sent_commands(&self) -> Vec<(String, VehicleCommand)> {
        self.sent_commands.read().await.clone()
    }

    /// Reset the call counters and the command log.
    pub async fn reset_counts(&self) {
        self.read_count.store(0, Ordering::Relaxed);
        self.command_count.store(0, Ordering::Relaxed);
        self.sent_commands.write().await.clear();
    }

    async fn read_latency(&self, plate: &str) -> Duration {
        if let Some(latency) = self.plate_latency.read().await.get(plate) {
            return *latency;
        }
        Duration::from_millis(self.read_latency_ms.load(Ordering::Relaxed))
    }

    async fn check_should_fail(&self, plate: &str) -> Result<()> {
        // Check for transient failures first
        if self.remaining_failures.load(Ordering::Relaxed) > 0 {
            self.remaining_failures.fetch_sub(1, Ordering::Relaxed);
            return Err(Error::request_failed(
                plate,
                self.fail_message.read().await.clone(),
            ));
        }

        if self.should_fail.load(Ordering::Relaxed) {
            Err(Error::request_failed(
                plate,
                self.fail_message.read().await.clone(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteClient for MockRemoteClient {
    async fn get_snapshot(&self, plate: &str) -> Result<VehicleSnapshot> {
        self.read_count.fetch_add(1, Ordering::Relaxed);

        let latency = self.read_latency(plate).await;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        self.check_should_fail(plate).await?;

        self.snapshots
            .read()
            .await
            .get(plate)
            .cloned()
            .ok_or_else(|| Error::not_found(plate))
    }

    async fn send_command(&self, plate: &str, command: VehicleCommand) -> Result<()> {
        self.command_count.fetch_add(1, Ordering::Relaxed);
        self.sent_commands
            .write()
            .await
            .push((plate.to_string(), command));

        let latency = self.command_latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if self.commands_should_fail.load(Ordering::Relaxed) {
            return Err(Error::command_failed(plate, command, "Mock failure"));
        }
        if !self.snapshots.read().await.contains_key(plate) {
            return Err(Error::command_failed(plate, command, "vehicle not found"));
        }
        Ok(())
    }
}

/// Builder for creating mock clients with custom settings.
#[derive(Debug, Default)]
pub struct MockRemoteClientBuilder {
    snapshots: HashMap<String, VehicleSnapshot>,
    read_latency: Duration,
    should_fail: bool,
    commands_should_fail: bool,
}

impl MockRemoteClientBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve this snapshot for its plate.
    #[must_use]
    pub fn snapshot(mut self, snapshot: VehicleSnapshot) -> Self {
        self.snapshots
            .insert(snapshot.license_plate.clone(), snapshot);
        self
    }

    /// Delay every read.
    #[must_use]
    pub fn read_latency(mut self, latency: Duration) -> Self {
        self.read_latency = latency;
        self
    }

    /// Fail every read.
    #[must_use]
    pub fn should_fail(mut self, fail: bool) -> Self {
        self.should_fail = fail;
        self
    }

    /// Fail every command.
    #[must_use]
    pub fn commands_should_fail(mut self, fail: bool) -> Self {
        self.commands_should_fail = fail;
        self
    }

    /// Build the mock client.
    #[must_use]
    pub fn build(self) -> MockRemoteClient {
        let client = MockRemoteClient::from_snapshots(self.snapshots);
        client.set_read_latency(self.read_latency);
        client.should_fail.store(self.should_fail, Ordering::Relaxed);
        client.set_commands_should_fail(self.commands_should_fail);
        client
    }
}
