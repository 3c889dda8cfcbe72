//! Change notifications for store observers.
//!
//! Every mutation broadcasts one of these over a tokio broadcast channel so
//! a UI (or anything else) can re-query without the store knowing about
//! rendering. There is no payload contract beyond "state changed"; the
//! counts and ids are a convenience.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Every store mutation emits one of these events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum QuoteEvent {
    /// The collection was (re)loaded from persistence
    Loaded {
        count: usize,
        /// True when the persisted encoding was absent or unreadable and the
        /// seed collection was used instead
        seeded: bool,
        timestamp: DateTime<Utc>,
    },
    /// One quote was added locally
    QuoteAdded {
        id: i64,
        category: String,
        timestamp: DateTime<Utc>,
    },
    /// A batch of quotes was imported
    Imported {
        count: usize,
        timestamp: DateTime<Utc>,
    },
    /// A reconciliation cycle replaced the collection
    Synced {
        total: usize,
        timestamp: DateTime<Utc>,
    },
}

impl QuoteEvent {
    /// Serialize to JSON for observers that forward events verbatim.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
