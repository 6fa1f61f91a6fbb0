//! Derived temperature series for display.
//!
//! The telemetry service only reports the current snapshot, so charts are fed
//! from a synthetic 24-hour series built around it. The synthesis sits behind
//! the [`SeriesSynthesizer`] trait so a real history source can replace it
//! without touching the engine.

use rand::Rng;
use time::{Duration, OffsetDateTime, UtcOffset};

use carsync_types::{TimeSeriesPoint, VehicleSnapshot};

/// Number of hourly buckets in a derived series.
pub const SERIES_BUCKETS: usize = 24;

/// Default cabin jitter radius in °C.
pub const DEFAULT_INDOOR_JITTER: f64 = 2.0;

/// Default outdoor jitter radius in °C.
pub const DEFAULT_OUTDOOR_JITTER: f64 = 3.0;

/// Produces a display series from a single snapshot.
pub trait SeriesSynthesizer: Send + Sync + std::fmt::Debug {
    /// Build the series ending at `now`, oldest point first.
    fn synthesize(&self, snapshot: &VehicleSnapshot, now: OffsetDateTime) -> Vec<TimeSeriesPoint>;
}

/// Hourly series with uniform random jitter around the snapshot values.
///
/// Each call draws fresh values; nothing is carried over between calls.
/// Labels are rendered in UTC unless a label offset is set. The local offset
/// can only be read reliably before a multi-threaded runtime starts, so
/// resolve it early and pass it to [`with_label_offset`](Self::with_label_offset).
#[derive(Debug, Clone, Copy)]
pub struct JitterSynthesizer {
    indoor_jitter: f64,
    outdoor_jitter: f64,
    label_offset: UtcOffset,
}

impl Default for JitterSynthesizer {
    fn default() -> Self {
        Self {
            indoor_jitter: DEFAULT_INDOOR_JITTER,
            outdoor_jitter: DEFAULT_OUTDOOR_JITTER,
            label_offset: UtcOffset::UTC,
        }
    }
}

impl JitterSynthesizer {
    /// Create a synthesizer with custom jitter radii (°C).
    pub fn new(indoor_jitter: f64, outdoor_jitter: f64) -> Self {
        Self {
            indoor_jitter: indoor_jitter.abs(),
            outdoor_jitter: outdoor_jitter.abs(),
            label_offset: UtcOffset::UTC,
        }
    }

    /// Render time labels at `offset` instead of UTC.
    #[must_use]
    pub fn with_label_offset(mut self, offset: UtcOffset) -> Self {
        self.label_offset = offset;
        self
    }

    /// Offset used for time labels.
    pub fn label_offset(&self) -> UtcOffset {
        self.label_offset
    }

    /// Cabin jitter radius.
    pub fn indoor_jitter(&self) -> f64 {
        self.indoor_jitter
    }

    /// Outdoor jitter radius.
    pub fn outdoor_jitter(&self) -> f64 {
        self.outdoor_jitter
    }
}

impl SeriesSynthesizer for JitterSynthesizer {
    fn synthesize(&self, snapshot: &VehicleSnapshot, now: OffsetDateTime) -> Vec<TimeSeriesPoint> {
        let mut rng = rand::rng();
        hourly_instants(now)
            .map(|at| TimeSeriesPoint {
                time_label: time_label(at, self.label_offset),
                at,
                indoor: snapshot.indoor_temp + jitter(&mut rng, self.indoor_jitter),
                outdoor: snapshot.outdoor_temp + jitter(&mut rng, self.outdoor_jitter),
            })
            .collect()
    }
}

/// Hourly series that repeats the snapshot values without noise. Labels are UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatSynthesizer;

impl SeriesSynthesizer for FlatSynthesizer {
    fn synthesize(&self, snapshot: &VehicleSnapshot, now: OffsetDateTime) -> Vec<TimeSeriesPoint> {
        hourly_instants(now)
            .map(|at| TimeSeriesPoint {
                time_label: time_label(at, UtcOffset::UTC),
                at,
                indoor: snapshot.indoor_temp,
                outdoor: snapshot.outdoor_temp,
            })
            .collect()
    }
}

/// Bucket instants from `now - 23h` up to `now`.
fn hourly_instants(now: OffsetDateTime) -> impl Iterator<Item = OffsetDateTime> {
    (0..SERIES_BUCKETS as i64)
        .rev()
        .map(move |hours_back| now - Duration::hours(hours_back))
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, radius: f64) -> f64 {
    if radius == 0.0 {
        0.0
    } else {
        rng.random_range(-radius..=radius)
    }
}

/// `HH:MM` label for `at` as seen at `offset`.
pub fn time_label(at: OffsetDateTime, offset: UtcOffset) -> String {
    let local = at.to_offset(offset);
    format!("{:02}:{:02}", local.hour(), local.minute())
}
