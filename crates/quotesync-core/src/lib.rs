//! # quotesync-core
//!
//! Local-first quote collection engine with remote reconciliation:
//!
//! - **QuoteStore**: the authoritative in-memory collection, loaded from and
//!   saved to an injected key-value persistence collaborator
//! - **Reconciler**: pure last-write-wins merge of a local and a remote
//!   collection, deduplicated by id
//! - **SyncScheduler**: periodic fetch-merge-persist-notify driver with an
//!   at-most-one-in-flight guard
//! - **Filter/Query**: category-filtered views with a persisted selection
//!
//! Storage and network are collaborators behind narrow traits
//! ([`KeyValueStore`], [`RemoteQuotes`]); the core never performs I/O it was
//! not handed. Observers subscribe to a broadcast of [`QuoteEvent`]s instead
//! of being called back directly.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use quotesync_core::{HttpRemote, MemoryStore, QuoteDraft, QuoteStore, SqliteStore, SyncScheduler};
//!
//! let durable = Arc::new(SqliteStore::new(None)?);
//! let session = Arc::new(MemoryStore::new());
//! let store = Arc::new(QuoteStore::new(durable, session));
//! store.load();
//!
//! let quote = store.add(QuoteDraft::new("Ship it.", "Motivation"))?;
//!
//! let scheduler = Arc::new(SyncScheduler::new(
//!     Arc::clone(&store),
//!     HttpRemote::new("https://example.com/quotes"),
//! ));
//! scheduler.push_quote(&quote).await;
//! tokio::spawn({
//!     let scheduler = Arc::clone(&scheduler);
//!     async move { scheduler.run().await }
//! });
//! ```
//!
//! ## Feature Flags
//!
//! - `http` (default): `reqwest`-backed [`HttpRemote`]
//! - `bundled-sqlite` (default): compile SQLite into [`SqliteStore`]

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod persist;
pub mod quote;
pub mod remote;
pub mod store;
pub mod sync;
pub mod view;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Quote types
pub use quote::{Quote, QuoteDraft, seed_quotes};

// Store layer
pub use store::{QuoteEvent, QuoteStore, StoreError};

// Persistence collaborators
pub use persist::{KeyValueStore, MemoryStore, PersistError, SqliteStore, keys};

// Remote collaborators
pub use remote::{RemoteError, RemoteQuotes};

#[cfg(feature = "http")]
#[cfg_attr(docsrs, doc(cfg(feature = "http")))]
pub use remote::HttpRemote;

// Reconciliation
pub use sync::{SyncConfig, SyncOutcome, SyncScheduler, merge};

// Views
pub use view::{ALL_CATEGORIES, CategoryView, filter_by_category};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        ALL_CATEGORIES, CategoryView, KeyValueStore, MemoryStore, Quote, QuoteDraft, QuoteEvent,
        QuoteStore, RemoteQuotes, SqliteStore, StoreError, SyncConfig, SyncOutcome, SyncScheduler,
        merge,
    };

    #[cfg(feature = "http")]
    pub use crate::HttpRemote;
}
