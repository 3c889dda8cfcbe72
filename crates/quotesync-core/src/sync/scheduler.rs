//! Sync scheduler
//!
//! Periodic reconciliation driver: fetch the remote collection, merge it into
//! the store, persist, notify. Failure is never fatal here - a broken fetch
//! is logged and retried on the next tick, and nothing a remote does can
//! crash the loop.
//!
//! Concurrency control is a single in-flight flag, not a lock: at most one
//! sync runs at a time, and a tick that arrives while one is running is
//! dropped rather than queued.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::merge;
use crate::quote::Quote;
use crate::remote::RemoteQuotes;
use crate::store::QuoteStore;

// ============================================================================
// CONFIG
// ============================================================================

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Time between automatic sync attempts
    pub interval: Duration,
    /// Whether `run` performs one sync immediately at startup, independent of
    /// the timer
    pub initial_sync: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            initial_sync: true,
        }
    }
}

impl SyncConfig {
    /// Config with a custom interval
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }
}

// ============================================================================
// OUTCOME
// ============================================================================

/// What a single sync attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Remote state was merged and committed
    Completed {
        /// Size of the reconciled collection
        total: usize,
    },
    /// The remote collection was empty; local state untouched (no
    /// destructive sync)
    NoRemoteData,
    /// A sync was already in flight; this attempt was dropped, not queued
    AlreadyRunning,
    /// Transport failure; local state untouched, retried on the next tick
    Failed,
}

// ============================================================================
// SCHEDULER
// ============================================================================

/// Drives periodic reconciliation between a [`QuoteStore`] and a remote.
///
/// States are Idle and Syncing; the transition into Syncing is guarded by an
/// atomic flag so overlapping triggers (timer tick plus a manual
/// [`SyncScheduler::sync_once`]) collapse to one in-flight cycle.
pub struct SyncScheduler<R> {
    store: Arc<QuoteStore>,
    remote: R,
    config: SyncConfig,
    in_flight: AtomicBool,
}

impl<R: RemoteQuotes> SyncScheduler<R> {
    /// Scheduler with the default 5-second interval.
    pub fn new(store: Arc<QuoteStore>, remote: R) -> Self {
        Self::with_config(store, remote, SyncConfig::default())
    }

    /// Scheduler with explicit configuration.
    pub fn with_config(store: Arc<QuoteStore>, remote: R, config: SyncConfig) -> Self {
        Self {
            store,
            remote,
            config,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Whether a sync cycle is currently in flight.
    pub fn is_syncing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Run one sync attempt.
    ///
    /// Safe to call from anywhere at any time: if a cycle is already in
    /// flight this returns [`SyncOutcome::AlreadyRunning`] without touching
    /// the network. Errors are contained here; the caller only ever sees an
    /// outcome.
    pub async fn sync_once(&self) -> SyncOutcome {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!("sync already in flight, dropping trigger");
            return SyncOutcome::AlreadyRunning;
        }
        let outcome = self.run_cycle().await;
        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }

    async fn run_cycle(&self) -> SyncOutcome {
        let remote = match self.remote.fetch_collection().await {
            Ok(collection) => collection,
            Err(e) => {
                warn!("remote fetch failed, retrying on next tick: {e}");
                return SyncOutcome::Failed;
            }
        };

        if remote.is_empty() {
            debug!("remote collection is empty, skipping merge");
            return SyncOutcome::NoRemoteData;
        }

        let local = self.store.snapshot();
        let merged = merge(&local, &remote);
        let total = merged.len();

        if let Err(e) = self.store.commit_sync(merged) {
            // Best-effort durability; the merged collection is live in memory
            warn!("reconciled collection not persisted: {e}");
        }
        info!(total, fetched = remote.len(), "sync complete");
        SyncOutcome::Completed { total }
    }

    /// Run the scheduler loop: one startup sync (if configured), then one
    /// attempt per interval tick, forever. Spawn this on the runtime:
    ///
    /// ```rust,ignore
    /// let scheduler = Arc::new(SyncScheduler::new(store, remote));
    /// tokio::spawn({
    ///     let scheduler = Arc::clone(&scheduler);
    ///     async move { scheduler.run().await }
    /// });
    /// ```
    pub async fn run(&self) {
        if self.config.initial_sync {
            self.sync_once().await;
        }

        let mut ticker = tokio::time::interval(self.config.interval);
        // A cycle outlasting the interval delays the next tick instead of
        // bursting to catch up
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval() fires immediately; the startup sync already covered that
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.sync_once().await;
        }
    }

    /// Offer a locally created quote to the remote.
    ///
    /// Transport failure is logged and swallowed, matching the scheduler
    /// boundary rule: the quote is already safe in the local store.
    pub async fn push_quote(&self, quote: &Quote) {
        match self.remote.post_quote(quote).await {
            Ok(()) => debug!(id = quote.id, "quote forwarded to remote"),
            Err(e) => warn!("quote not forwarded to remote: {e}"),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
