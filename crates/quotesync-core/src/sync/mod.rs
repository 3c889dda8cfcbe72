//! Synchronization - reconciliation core and its periodic driver
//!
//! [`merge`] is the pure last-write-wins reconciler; [`SyncScheduler`] is the
//! timer-driven state machine that feeds it remote state and commits the
//! result back into the store.

mod merge;
mod scheduler;

pub use merge::merge;
pub use scheduler::{SyncConfig, SyncOutcome, SyncScheduler};
