//! Client-side telemetry sync for rental vehicles.
//!
//! This crate keeps a presentation layer's view of one vehicle in step with a
//! remote telemetry service. It looks up the latest snapshot by license plate,
//! refreshes it on demand or on a timer, derives a 24-hour display series and
//! forwards remote commands.
//!
//! # Features
//!
//! - **Ordered fetches**: a response is applied only if no newer request was
//!   issued after it, so fast typing never shows the wrong car
//! - **Stale data on failure**: a failed refresh keeps the last good snapshot
//!   visible next to the error
//! - **Auto-refresh**: cancellable background timer tied to the engine's
//!   lifetime
//! - **Observable state**: every change is published on a
//!   [`tokio::sync::watch`] channel
//! - **Pluggable transport**: anything implementing [`RemoteClient`]; an HTTP
//!   client is available behind the `http-client` feature and a scriptable
//!   mock is always included
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use carsync_core::{MockRemoteClient, SyncEngine, VehicleCommand};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = SyncEngine::new(Arc::new(MockRemoteClient::demo()));
//!
//!     engine.fetch("ABC-123").await?;
//!     let state = engine.state();
//!     if let Some(snapshot) = &state.snapshot {
//!         println!("{}: {:.1}°C inside", snapshot.license_plate, snapshot.indoor_temp);
//!     }
//!
//!     engine.send_command("ABC-123", VehicleCommand::StartHeating).await?;
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod mock;
pub mod options;
pub mod series;
#[cfg(feature = "http-client")]
pub mod service_client;
pub mod state;
pub mod traits;

// Re-export the shared data model
pub use carsync_types;

pub use engine::{FetchOutcome, SyncEngine};
pub use error::{Error, Result};
pub use mock::{MockRemoteClient, MockRemoteClientBuilder};
pub use options::{DEFAULT_REFRESH_INTERVAL, SyncOptions, SyncOptionsBuilder};
pub use series::{FlatSynthesizer, JitterSynthesizer, SERIES_BUCKETS, SeriesSynthesizer};
#[cfg(feature = "http-client")]
pub use service_client::HttpRemoteClient;
pub use state::{SyncState, SyncStatus};
pub use traits::RemoteClient;

pub use carsync_types::{
    GpsPosition, IndoorComfort, OutdoorConditions, ParseError, TimeSeriesPoint, VehicleCommand,
    VehicleSnapshot, validate_plate,
};
