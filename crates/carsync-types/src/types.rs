//! Core types for vehicle telemetry data.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{ParseError, ParseResult};

/// Indoor temperature above which the cabin counts as comfortable (°C).
pub const COMFORTABLE_INDOOR_ABOVE: f64 = 20.0;

/// Outdoor temperature above which the weather counts as mild (°C).
pub const MILD_OUTDOOR_ABOVE: f64 = 15.0;

/// Check that a license plate is usable as a request key.
///
/// Blank and whitespace-only plates are rejected. The plate is returned
/// unchanged otherwise: plates are case-sensitive and are sent exactly as
/// the user typed them.
///
/// # Examples
///
/// ```
/// use carsync_types::validate_plate;
///
/// assert_eq!(validate_plate("ABC-123"), Ok("ABC-123"));
/// assert!(validate_plate("   ").is_err());
/// ```
pub fn validate_plate(plate: &str) -> ParseResult<&str> {
    if plate.trim().is_empty() {
        Err(ParseError::BlankPlate)
    } else {
        Ok(plate)
    }
}

/// GPS position of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsPosition {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

impl GpsPosition {
    /// Create a new position.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for GpsPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// One point-in-time telemetry reading for a vehicle.
///
/// Snapshots are value types: once received from the telemetry service they
/// are never modified, only replaced by a newer snapshot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct VehicleSnapshot {
    /// License plate the snapshot was requested for.
    pub license_plate: String,
    /// Outdoor temperature in degrees Celsius.
    pub outdoor_temp: f64,
    /// Cabin temperature in degrees Celsius.
    pub indoor_temp: f64,
    /// Last known position, if the vehicle reported one.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub gps: Option<GpsPosition>,
    /// Registered owner, as a display string.
    pub owner: String,
    /// Last service date, as an opaque display string.
    pub last_service: String,
    /// When the telemetry service last heard from the vehicle.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub last_updated: OffsetDateTime,
}

impl Default for VehicleSnapshot {
    fn default() -> Self {
        Self {
            license_plate: String::new(),
            outdoor_temp: 0.0,
            indoor_temp: 0.0,
            gps: None,
            owner: String::new(),
            last_service: String::new(),
            last_updated: OffsetDateTime::UNIX_EPOCH,
        }
    }
}

impl VehicleSnapshot {
    /// Create a builder for constructing a `VehicleSnapshot`.
    pub fn builder(license_plate: impl Into<String>) -> VehicleSnapshotBuilder {
        VehicleSnapshotBuilder {
            snapshot: VehicleSnapshot {
                license_plate: license_plate.into(),
                ..Default::default()
            },
        }
    }

    /// Comfort classification of the cabin temperature.
    #[must_use]
    pub fn indoor_comfort(&self) -> IndoorComfort {
        IndoorComfort::classify(self.indoor_temp)
    }

    /// Classification of the outdoor temperature.
    #[must_use]
    pub fn outdoor_conditions(&self) -> OutdoorConditions {
        OutdoorConditions::classify(self.outdoor_temp)
    }
}

/// Builder for constructing a `VehicleSnapshot`.
#[derive(Debug)]
#[must_use]
pub struct VehicleSnapshotBuilder {
    snapshot: VehicleSnapshot,
}

impl VehicleSnapshotBuilder {
    /// Set the outdoor temperature.
    pub fn outdoor_temp(mut self, temp: f64) -> Self {
        self.snapshot.outdoor_temp = temp;
        self
    }

    /// Set the cabin temperature.
    pub fn indoor_temp(mut self, temp: f64) -> Self {
        self.snapshot.indoor_temp = temp;
        self
    }

    /// Set the GPS position.
    pub fn gps(mut self, lat: f64, lng: f64) -> Self {
        self.snapshot.gps = Some(GpsPosition::new(lat, lng));
        self
    }

    /// Set the owner.
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.snapshot.owner = owner.into();
        self
    }

    /// Set the last service string.
    pub fn last_service(mut self, last_service: impl Into<String>) -> Self {
        self.snapshot.last_service = last_service.into();
        self
    }

    /// Set the last update instant.
    pub fn last_updated(mut self, last_updated: OffsetDateTime) -> Self {
        self.snapshot.last_updated = last_updated;
        self
    }

    /// Build the `VehicleSnapshot`.
    #[must_use]
    pub fn build(self) -> VehicleSnapshot {
        self.snapshot
    }
}

/// A single display point of the derived temperature series.
///
/// Points are synthetic: they are generated from one snapshot for display
/// and carry no authority about the vehicle's real history.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TimeSeriesPoint {
    /// Local `HH:MM` rendering of [`at`](Self::at).
    pub time_label: String,
    /// The bucket instant.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub at: OffsetDateTime,
    /// Cabin temperature in degrees Celsius.
    pub indoor: f64,
    /// Outdoor temperature in degrees Celsius.
    pub outdoor: f64,
}

/// Remote commands that can be sent to a vehicle.
///
/// This enum is marked `#[non_exhaustive]` so new commands can be added
/// without touching the dispatch logic.
///
/// ```
/// use carsync_types::VehicleCommand;
///
/// let cmd: VehicleCommand = "start_heating".parse().unwrap();
/// assert_eq!(cmd, VehicleCommand::StartHeating);
/// assert_eq!(cmd.to_string(), "start_heating");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[non_exhaustive]
pub enum VehicleCommand {
    /// Start the cabin heater.
    StartHeating,
    /// Put the vehicle into service mode.
    ServiceMode,
}

impl VehicleCommand {
    /// All known commands.
    pub const ALL: [VehicleCommand; 2] = [VehicleCommand::StartHeating, VehicleCommand::ServiceMode];

    /// Wire name of the command.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleCommand::StartHeating => "start_heating",
            VehicleCommand::ServiceMode => "service_mode",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            VehicleCommand::StartHeating => "Start Heating",
            VehicleCommand::ServiceMode => "Service Mode",
        }
    }
}

impl fmt::Display for VehicleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleCommand {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        VehicleCommand::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| ParseError::UnknownCommand(s.to_string()))
    }
}

/// Request body for the command endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CommandRequest {
    /// The command to execute.
    pub command: VehicleCommand,
}

/// Comfort classification of the cabin temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IndoorComfort {
    /// Above [`COMFORTABLE_INDOOR_ABOVE`].
    Comfortable,
    /// At or below [`COMFORTABLE_INDOOR_ABOVE`].
    Cold,
}

impl IndoorComfort {
    /// Classify a cabin temperature in °C.
    #[must_use]
    pub fn classify(temp: f64) -> Self {
        if temp > COMFORTABLE_INDOOR_ABOVE {
            IndoorComfort::Comfortable
        } else {
            IndoorComfort::Cold
        }
    }
}

impl fmt::Display for IndoorComfort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndoorComfort::Comfortable => write!(f, "Comfortable"),
            IndoorComfort::Cold => write!(f, "Cold"),
        }
    }
}

/// Classification of the outdoor temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OutdoorConditions {
    /// Above [`MILD_OUTDOOR_ABOVE`].
    Mild,
    /// At or below [`MILD_OUTDOOR_ABOVE`].
    Cold,
}

impl OutdoorConditions {
    /// Classify an outdoor temperature in °C.
    #[must_use]
    pub fn classify(temp: f64) -> Self {
        if temp > MILD_OUTDOOR_ABOVE {
            OutdoorConditions::Mild
        } else {
            OutdoorConditions::Cold
        }
    }
}

impl fmt::Display for OutdoorConditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutdoorConditions::Mild => write!(f, "Mild"),
            OutdoorConditions::Cold => write!(f, "Cold"),
        }
    }
}
