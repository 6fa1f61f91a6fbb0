//! Engine configuration.
//!
//! Use the builder for convenient configuration:
//!
//! ```
//! use std::time::Duration;
//! use carsync_core::SyncOptions;
//!
//! let options = SyncOptions::builder()
//!     .refresh_interval(Duration::from_secs(10))
//!     .build();
//! assert!(options.validate().is_ok());
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::series::{JitterSynthesizer, SeriesSynthesizer};

/// Default auto-refresh interval.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Options for a [`crate::SyncEngine`].
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Interval used by [`crate::SyncEngine::start_default_auto_refresh`].
    /// Default: 30 seconds.
    pub refresh_interval: Duration,
    /// Builds the display series on each successful fetch.
    /// Default: [`JitterSynthesizer`].
    pub synthesizer: Arc<dyn SeriesSynthesizer>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            synthesizer: Arc::new(JitterSynthesizer::default()),
        }
    }
}

impl SyncOptions {
    /// Create a new builder for SyncOptions.
    pub fn builder() -> SyncOptionsBuilder {
        SyncOptionsBuilder::default()
    }

    /// Create options with a specific refresh interval.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            refresh_interval: interval,
            ..Default::default()
        }
    }

    /// Validate the options and return an error if invalid.
    ///
    /// Checks that `refresh_interval` is > 0.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval.is_zero() {
            return Err(Error::invalid_config("refresh_interval must be > 0"));
        }
        Ok(())
    }
}

/// Builder for SyncOptions.
#[derive(Debug, Clone, Default)]
pub struct SyncOptionsBuilder {
    options: SyncOptions,
}

impl SyncOptionsBuilder {
    /// Set the auto-refresh interval.
    #[must_use]
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.options.refresh_interval = interval;
        self
    }

    /// Replace the series synthesizer.
    #[must_use]
    pub fn synthesizer(mut self, synthesizer: impl SeriesSynthesizer + 'static) -> Self {
        self.options.synthesizer = Arc::new(synthesizer);
        self
    }

    /// Build the SyncOptions.
    #[must_use]
    pub fn build(self) -> SyncOptions {
        self.options
    }
}
