//! Observable sync state.

use carsync_types::{TimeSeriesPoint, VehicleSnapshot};

/// Lifecycle status of a lookup.
///
/// Transitions are `Idle -> Loading -> {Ready, Error}`; from `Ready` or
/// `Error` a new fetch or refresh re-enters `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SyncStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The last applied request succeeded.
    Ready,
    /// The last applied request failed.
    Error,
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Ready => write!(f, "ready"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// State of one lookup session, owned by a [`crate::SyncEngine`].
///
/// `series` is non-empty only while `snapshot` is present. After a failed
/// refresh both are kept (stale data) while `status` is `Error`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncState {
    /// Plate of the last applied fetch, empty before the first one.
    pub plate: String,
    /// Last successfully received snapshot.
    pub snapshot: Option<VehicleSnapshot>,
    /// Current status.
    pub status: SyncStatus,
    /// Human-readable cause, set only in `Error`.
    pub error_message: Option<String>,
    /// Derived display series for `snapshot`.
    pub series: Vec<TimeSeriesPoint>,
}

impl SyncState {
    /// Whether a snapshot is held.
    #[must_use]
    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Whether the held snapshot is shown despite a failed refresh.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.status == SyncStatus::Error && self.snapshot.is_some()
    }

    /// Whether a request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == SyncStatus::Loading
    }
}
