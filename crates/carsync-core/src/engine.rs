//! Telemetry sync engine.
//!
//! [`SyncEngine`] owns one [`SyncState`], fetches snapshots on demand, keeps
//! them fresh with an optional auto-refresh timer, and dispatches remote
//! commands.
//!
//! # Ordering
//!
//! Every fetch takes a ticket from a monotonically increasing counter before
//! it suspends on the network. When the response arrives it is applied only
//! if no newer fetch has been issued since; otherwise it is dropped and the
//! call reports [`FetchOutcome::Superseded`]. A slow response can therefore
//! never overwrite state produced by a request issued after it.
//!
//! # Auto-refresh
//!
//! The timer is a background task with a cancellation token, in the same
//! shape as a polling reading stream. It fires one full interval after start
//! and exits on its own once no snapshot is held. A tick that lands while a
//! fetch is in flight is skipped. A refresh the timer has started always runs
//! to completion, even if the timer is stopped meanwhile.
//!
//! A fetch that is abandoned (its future dropped, or the engine shut down)
//! never leaves the state in `Loading`.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use carsync_core::{MockRemoteClient, SyncEngine};
//!
//! # async fn example() -> carsync_core::Result<()> {
//! let engine = SyncEngine::new(Arc::new(MockRemoteClient::demo()));
//! engine.fetch("ABC-123").await?;
//! engine.start_auto_refresh(Duration::from_secs(30));
//!
//! let mut updates = engine.subscribe();
//! while updates.changed().await.is_ok() {
//!     println!("status: {}", updates.borrow().status);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use carsync_types::{VehicleCommand, VehicleSnapshot, validate_plate};

use crate::error::{Error, Result};
use crate::options::SyncOptions;
use crate::state::{SyncState, SyncStatus};
use crate::traits::RemoteClient;

/// How a fetch or refresh ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A snapshot was received and applied.
    Updated,
    /// The request failed; the failure was applied to the state.
    Failed,
    /// A newer request was issued (or the engine was torn down) before the
    /// response arrived; the response was discarded.
    Superseded,
}

/// State shared between the engine handle and its timer task.
struct Shared {
    client: Arc<dyn RemoteClient>,
    options: SyncOptions,
    state: watch::Sender<SyncState>,
    /// Ticket of the most recently issued fetch.
    issued: AtomicU64,
    /// Plate of the most recently issued fetch; refreshes target it.
    requested: Mutex<String>,
}

/// Settles the state if its fetch is dropped before the response is applied.
struct InFlight<'a> {
    shared: &'a Shared,
    ticket: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.shared.settle_loading(self.ticket);
    }
}

impl Shared {
    async fn fetch(&self, plate: &str) -> FetchOutcome {
        let ticket = {
            let mut requested = lock(&self.requested);
            *requested = plate.to_string();
            self.issued.fetch_add(1, Ordering::SeqCst) + 1
        };
        let _in_flight = InFlight {
            shared: self,
            ticket,
        };
        self.state.send_modify(|s| {
            s.status = SyncStatus::Loading;
            s.error_message = None;
        });

        debug!(plate, ticket, "Fetching vehicle snapshot");
        let result = self.client.get_snapshot(plate).await;
        self.apply(ticket, plate, result)
    }

    async fn refresh(&self) -> Option<FetchOutcome> {
        let held = self.state.borrow().has_snapshot();
        if !held {
            return None;
        }
        let plate = lock(&self.requested).clone();
        Some(self.fetch(&plate).await)
    }

    fn apply(&self, ticket: u64, plate: &str, result: Result<VehicleSnapshot>) -> FetchOutcome {
        let mut outcome = FetchOutcome::Superseded;

        self.state.send_if_modified(|s| {
            // Checked under the channel lock so no newer apply can interleave.
            let latest = self.issued.load(Ordering::SeqCst);
            if latest != ticket {
                debug!(plate, ticket, latest, "Discarding superseded response");
                return false;
            }

            match result {
                Ok(snapshot) => {
                    s.series = self
                        .options
                        .synthesizer
                        .synthesize(&snapshot, OffsetDateTime::now_utc());
                    s.snapshot = Some(snapshot);
                    s.status = SyncStatus::Ready;
                    s.error_message = None;
                    outcome = FetchOutcome::Updated;
                }
                Err(err) => {
                    let is_refresh = s.snapshot.is_some() && s.plate == plate;
                    if is_refresh {
                        warn!(plate, error = %err, "Refresh failed, keeping stale snapshot");
                    } else {
                        warn!(plate, error = %err, "Fetch failed");
                        s.snapshot = None;
                        s.series.clear();
                    }
                    s.status = SyncStatus::Error;
                    s.error_message = Some(err.user_message());
                    outcome = FetchOutcome::Failed;
                }
            }
            s.plate = plate.to_string();
            true
        });

        outcome
    }

    /// Make every in-flight response stale. Returns the new latest ticket.
    fn invalidate_in_flight(&self) -> u64 {
        let mut requested = lock(&self.requested);
        *requested = self.state.borrow().plate.clone();
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Leave `Loading` if `ticket` is still the latest and will not be applied.
    fn settle_loading(&self, ticket: u64) {
        self.state.send_if_modified(|s| {
            if s.status != SyncStatus::Loading || self.issued.load(Ordering::SeqCst) != ticket {
                return false;
            }
            debug!(ticket, "Fetch abandoned before its response arrived");
            s.status = if s.snapshot.is_some() {
                SyncStatus::Ready
            } else {
                SyncStatus::Idle
            };
            true
        });
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct AutoRefresh {
    cancel_token: CancellationToken,
    handle: JoinHandle<()>,
}

impl AutoRefresh {
    fn spawn(shared: Arc<Shared>, period: Duration) -> Self {
        let cancel_token = CancellationToken::new();
        let task_token = cancel_token.clone();
        let mut updates = shared.state.subscribe();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => {
                        debug!("Auto-refresh cancelled");
                        break;
                    }
                    changed = updates.changed() => {
                        if changed.is_err() || !updates.borrow_and_update().has_snapshot() {
                            debug!("No snapshot held, stopping auto-refresh");
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        let in_flight = shared.state.borrow().is_loading();
                        if in_flight {
                            debug!("Fetch in flight, skipping auto-refresh tick");
                            continue;
                        }
                        if shared.refresh().await.is_none() {
                            debug!("No snapshot held, stopping auto-refresh");
                            break;
                        }
                    }
                }
            }
        });

        Self {
            cancel_token,
            handle,
        }
    }

    fn is_active(&self) -> bool {
        !self.cancel_token.is_cancelled() && !self.handle.is_finished()
    }

    fn stop(self) {
        self.cancel_token.cancel();
    }
}

/// Client-side telemetry sync for one presentation session.
///
/// Read access goes through [`state`](Self::state) or
/// [`subscribe`](Self::subscribe); every mutation goes through the engine's
/// operations. Dropping the engine stops auto-refresh and discards any
/// response still in flight.
pub struct SyncEngine {
    shared: Arc<Shared>,
    auto_refresh: Mutex<Option<AutoRefresh>>,
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("SyncEngine")
            .field("plate", &state.plate)
            .field("status", &state.status)
            .field("auto_refresh", &self.is_auto_refreshing())
            .finish()
    }
}

impl SyncEngine {
    /// Create an engine with default options.
    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        Self::build(client, SyncOptions::default())
    }

    /// Create an engine with custom options.
    ///
    /// Fails with [`Error::InvalidConfig`] if the options do not validate.
    pub fn with_options(client: Arc<dyn RemoteClient>, options: SyncOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::build(client, options))
    }

    fn build(client: Arc<dyn RemoteClient>, options: SyncOptions) -> Self {
        let (state, _) = watch::channel(SyncState::default());
        Self {
            shared: Arc::new(Shared {
                client,
                options,
                state,
                issued: AtomicU64::new(0),
                requested: Mutex::new(String::new()),
            }),
            auto_refresh: Mutex::new(None),
        }
    }

    /// The options this engine was built with.
    pub fn options(&self) -> &SyncOptions {
        &self.shared.options
    }

    /// A copy of the current state.
    pub fn state(&self) -> SyncState {
        self.shared.state.borrow().clone()
    }

    /// Receive a notification on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.shared.state.subscribe()
    }

    /// Fetch the snapshot for `plate`.
    ///
    /// Blank plates are rejected with [`Error::InvalidInput`] before any
    /// network call and leave the state untouched. Otherwise exactly one read
    /// is issued and its outcome is written to the state; network failures
    /// are reported through the state, not as `Err`.
    pub async fn fetch(&self, plate: &str) -> Result<FetchOutcome> {
        let plate = validate_plate(plate)?;
        Ok(self.shared.fetch(plate).await)
    }

    /// Re-fetch the most recently requested plate while a snapshot is held.
    ///
    /// Returns `None` without side effects when no snapshot is held. On
    /// failure the held snapshot and series stay visible next to the error.
    /// While a fetch for another plate is in flight, that plate is refreshed.
    pub async fn refresh(&self) -> Option<FetchOutcome> {
        self.shared.refresh().await
    }

    /// Start refreshing every `interval` while a snapshot is held.
    ///
    /// Replaces any running timer. Returns `false` and starts nothing when no
    /// snapshot is held or the interval is zero. Must be called from within a
    /// Tokio runtime.
    pub fn start_auto_refresh(&self, interval: Duration) -> bool {
        if interval.is_zero() {
            warn!("Ignoring auto-refresh with a zero interval");
            return false;
        }
        if !self.shared.state.borrow().has_snapshot() {
            debug!("No snapshot held, not starting auto-refresh");
            return false;
        }

        let mut slot = self.auto_refresh_slot();
        if let Some(previous) = slot.take() {
            previous.stop();
        }
        debug!(?interval, "Starting auto-refresh");
        *slot = Some(AutoRefresh::spawn(Arc::clone(&self.shared), interval));
        true
    }

    /// Start auto-refresh with the configured interval.
    pub fn start_default_auto_refresh(&self) -> bool {
        self.start_auto_refresh(self.shared.options.refresh_interval)
    }

    /// Stop auto-refresh. No timer fires after this returns; a refresh
    /// already started by the timer still completes.
    pub fn stop_auto_refresh(&self) {
        if let Some(timer) = self.auto_refresh_slot().take() {
            debug!("Stopping auto-refresh");
            timer.stop();
        }
    }

    /// Whether an auto-refresh timer is live.
    pub fn is_auto_refreshing(&self) -> bool {
        self.auto_refresh_slot()
            .as_ref()
            .is_some_and(AutoRefresh::is_active)
    }

    /// Send a remote command.
    ///
    /// Never touches the state: the effect of a command only becomes visible
    /// through a later refresh.
    pub async fn send_command(&self, plate: &str, command: VehicleCommand) -> Result<()> {
        let plate = validate_plate(plate)?;

        match self.shared.client.send_command(plate, command).await {
            Ok(()) => {
                info!(plate, %command, "Command accepted");
                Ok(())
            }
            Err(err) => {
                warn!(plate, %command, error = %err, "Command failed");
                Err(match err {
                    Error::CommandFailed { .. } => err,
                    other => Error::command_failed(plate, command, other.to_string()),
                })
            }
        }
    }

    /// Drop the session: stop the timer, discard in-flight responses and
    /// return to an empty `Idle` state.
    pub fn reset(&self) {
        self.stop_auto_refresh();
        self.shared.invalidate_in_flight();
        self.shared.state.send_replace(SyncState::default());
    }

    /// Stop the timer and discard every response still in flight.
    ///
    /// The held snapshot is kept. A pending `Loading` status settles to
    /// `Ready` when a snapshot is held and to `Idle` otherwise.
    pub fn shutdown(&self) {
        self.stop_auto_refresh();
        let ticket = self.shared.invalidate_in_flight();
        self.shared.settle_loading(ticket);
    }

    fn auto_refresh_slot(&self) -> MutexGuard<'_, Option<AutoRefresh>> {
        lock(&self.auto_refresh)
    }
}

impl Drop for SyncEngine {
    fn drop(&mut self) {
        // Ensure the timer task stops even if shutdown() was never called.
        self.shutdown();
    }
}
