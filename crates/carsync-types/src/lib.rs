//! Platform-agnostic types for rental vehicle telemetry.
//!
//! This crate provides the data model shared by the sync engine
//! (carsync-core) and any presentation layer built on top of it.
//!
//! # Features
//!
//! - Vehicle snapshot and GPS position types
//! - Derived time-series point type
//! - Remote command enumeration and its request body
//! - Temperature comfort classification
//! - Error types for validation and parsing
//!
//! # Example
//!
//! ```
//! use carsync_types::{IndoorComfort, VehicleSnapshot};
//!
//! let snapshot = VehicleSnapshot::builder("ABC-123").indoor_temp(22.0).build();
//! assert_eq!(snapshot.indoor_comfort(), IndoorComfort::Comfortable);
//! ```

pub mod error;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use types::{
    COMFORTABLE_INDOOR_ABOVE, CommandRequest, GpsPosition, IndoorComfort, MILD_OUTDOOR_ABOVE,
    OutdoorConditions, TimeSeriesPoint, VehicleCommand, VehicleSnapshot, VehicleSnapshotBuilder,
    validate_plate,
};
