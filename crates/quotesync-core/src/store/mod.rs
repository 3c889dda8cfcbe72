//! QuoteStore - the authoritative in-memory collection
//!
//! Owns the quote collection, loads and saves it through an injected
//! [`KeyValueStore`], and broadcasts [`QuoteEvent`]s after every mutation.
//!
//! All methods take `&self` (not `&mut self`): the collection lives behind a
//! mutex so callers can share an `Arc<QuoteStore>` between the UI side and
//! the sync scheduler. Critical sections are short and never perform I/O on
//! the collection lock.
//!
//! Durability is best-effort by design: a failed `save` surfaces a
//! [`StoreError::Persistence`] to the caller but never rolls back the
//! in-memory mutation, because the in-memory collection is the source of
//! truth.

mod events;

pub use events::QuoteEvent;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use rand::RngExt;
use tokio::sync::broadcast;
use tracing::warn;

use crate::persist::{KeyValueStore, PersistError, keys};
use crate::quote::{Quote, QuoteDraft, seed_quotes};
use crate::view;

/// Broadcast buffer; slow observers miss events rather than blocking mutations
const EVENT_CHANNEL_CAPACITY: usize = 64;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Store error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A draft failed validation; nothing was mutated
    #[error("validation failed: {0}")]
    Validation(String),
    /// An import payload was not a JSON array of quotes; nothing was mutated
    #[error("format error: {0}")]
    Format(String),
    /// The persistence collaborator rejected a write; the in-memory state
    /// kept the mutation
    #[error("persistence failed: {0}")]
    Persistence(#[from] PersistError),
}

/// Store result type
pub type Result<T> = std::result::Result<T, StoreError>;

// ============================================================================
// QUOTE STORE
// ============================================================================

/// The authoritative quote collection plus its persistence collaborators.
///
/// `durable` holds the collection and the category preference; `session`
/// holds only the last-viewed quote and is expected to be dropped (and thus
/// cleared) when the session ends.
pub struct QuoteStore {
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
    quotes: Mutex<Vec<Quote>>,
    last_id: Mutex<i64>,
    events: broadcast::Sender<QuoteEvent>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A poisoned lock still guards coherent data; mutations never panic
    // mid-write, so keep serving it.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl QuoteStore {
    /// Create an empty store over the given collaborators.
    ///
    /// Call [`QuoteStore::load`] afterwards to populate it; a store that was
    /// never loaded is simply empty.
    pub fn new(durable: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            durable,
            session,
            quotes: Mutex::new(Vec::new()),
            last_id: Mutex::new(0),
            events,
        }
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<QuoteEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: QuoteEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }

    /// Next quote id: epoch milliseconds, bumped past the last assigned id so
    /// two adds inside one millisecond still get unique, increasing ids.
    fn next_id(&self, now: DateTime<Utc>) -> i64 {
        let mut last = lock(&self.last_id);
        let id = now.timestamp_millis().max(*last + 1);
        *last = id;
        id
    }

    /// Make sure future ids stay above everything in `quotes`.
    fn observe_ids(&self, quotes: &[Quote]) {
        if let Some(max) = quotes.iter().filter_map(|q| q.id).max() {
            let mut last = lock(&self.last_id);
            *last = (*last).max(max);
        }
    }

    // ------------------------------------------------------------------
    // Load / save
    // ------------------------------------------------------------------

    /// Load the collection from the durable store.
    ///
    /// Absence or an undecodable encoding falls back to the fixed seed
    /// collection; that recovery is silent (a warning log only) and this
    /// method never fails.
    pub fn load(&self) {
        let loaded = match self.durable.get(keys::QUOTES) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Quote>>(&raw) {
                Ok(list) => Some(list),
                Err(e) => {
                    warn!("persisted quote collection is undecodable, reseeding: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("persisted quote collection is unreadable, reseeding: {e}");
                None
            }
        };

        let seeded = loaded.is_none();
        let list = loaded.unwrap_or_else(seed_quotes);
        let count = list.len();

        self.observe_ids(&list);
        *lock(&self.quotes) = list;
        self.emit(QuoteEvent::Loaded {
            count,
            seeded,
            timestamp: Utc::now(),
        });
    }

    /// Serialize the collection and write it to the durable store.
    pub fn save(&self) -> Result<()> {
        let encoded = {
            let quotes = lock(&self.quotes);
            serde_json::to_string(&*quotes)
                .map_err(|e| StoreError::Format(format!("collection not serializable: {e}")))?
        };
        self.durable.set(keys::QUOTES, &encoded)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Validate a draft, stamp it, append it, and persist.
    ///
    /// Returns the stored quote so the caller can optionally forward it to
    /// the remote collaborator. A persistence failure is returned as an
    /// error, but the quote is already part of the in-memory collection.
    pub fn add(&self, draft: QuoteDraft) -> Result<Quote> {
        let text = draft.text.trim();
        let category = draft.category.trim();
        if text.is_empty() {
            return Err(StoreError::Validation("quote text is empty".to_string()));
        }
        if category.is_empty() {
            return Err(StoreError::Validation(
                "quote category is empty".to_string(),
            ));
        }

        let now = Utc::now();
        let quote = Quote {
            id: Some(self.next_id(now)),
            text: text.to_string(),
            category: category.to_string(),
            updated_at: Some(now),
        };

        lock(&self.quotes).push(quote.clone());
        let saved = self.save();
        self.emit(QuoteEvent::QuoteAdded {
            id: quote.id.unwrap_or_default(),
            category: quote.category.clone(),
            timestamp: now,
        });
        saved?;
        Ok(quote)
    }

    /// Append a batch of already-decoded quotes without deduplication.
    pub fn import_many(&self, incoming: Vec<Quote>) -> Result<usize> {
        let count = incoming.len();
        self.observe_ids(&incoming);
        lock(&self.quotes).extend(incoming);
        let saved = self.save();
        self.emit(QuoteEvent::Imported {
            count,
            timestamp: Utc::now(),
        });
        saved?;
        Ok(count)
    }

    /// Decode a JSON payload and import it.
    ///
    /// The payload must be a JSON array; entries may lack `id`/`updatedAt`
    /// (they pass straight through). Anything else fails with
    /// [`StoreError::Format`] and leaves the store untouched.
    pub fn import_json(&self, payload: &str) -> Result<usize> {
        let value: serde_json::Value = serde_json::from_str(payload)
            .map_err(|e| StoreError::Format(format!("payload is not valid JSON: {e}")))?;
        if !value.is_array() {
            return Err(StoreError::Format(
                "import payload must be a JSON array".to_string(),
            ));
        }
        let incoming: Vec<Quote> = serde_json::from_value(value)
            .map_err(|e| StoreError::Format(format!("array entries are not quotes: {e}")))?;
        self.import_many(incoming)
    }

    /// Pretty-printed JSON encoding of the collection (the export format).
    pub fn export_json(&self) -> Result<String> {
        let quotes = lock(&self.quotes);
        serde_json::to_string_pretty(&*quotes)
            .map_err(|e| StoreError::Format(format!("collection not serializable: {e}")))
    }

    /// Replace the collection with a reconciled one and persist it.
    ///
    /// This is the sync commit path: the scheduler computes the merge and the
    /// store owns replacement, persistence, and the `Synced` notification.
    pub fn commit_sync(&self, merged: Vec<Quote>) -> Result<usize> {
        let total = merged.len();
        self.observe_ids(&merged);
        *lock(&self.quotes) = merged;
        let saved = self.save();
        self.emit(QuoteEvent::Synced {
            total,
            timestamp: Utc::now(),
        });
        saved?;
        Ok(total)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Clone of the current collection.
    pub fn snapshot(&self) -> Vec<Quote> {
        lock(&self.quotes).clone()
    }

    /// Number of quotes currently held.
    pub fn len(&self) -> usize {
        lock(&self.quotes).len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        lock(&self.quotes).is_empty()
    }

    /// Quotes in `category`, relative order preserved; `"all"` means
    /// everything.
    pub fn filter(&self, category: &str) -> Vec<Quote> {
        view::filter_by_category(&lock(&self.quotes), category)
    }

    /// Unique categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let quotes = lock(&self.quotes);
        let mut seen = Vec::new();
        for quote in quotes.iter() {
            if !seen.contains(&quote.category) {
                seen.push(quote.category.clone());
            }
        }
        seen
    }

    // ------------------------------------------------------------------
    // Random quote / session state
    // ------------------------------------------------------------------

    /// Pick a uniformly random quote and remember it in the session store.
    pub fn random_quote(&self) -> Option<Quote> {
        let quote = {
            let quotes = lock(&self.quotes);
            if quotes.is_empty() {
                return None;
            }
            quotes[rand::rng().random_range(0..quotes.len())].clone()
        };

        match serde_json::to_string(&quote) {
            Ok(raw) => {
                if let Err(e) = self.session.set(keys::LAST_VIEWED, &raw) {
                    warn!("last-viewed quote not persisted to session store: {e}");
                }
            }
            Err(e) => warn!("last-viewed quote not serializable: {e}"),
        }
        Some(quote)
    }

    /// The quote last shown by [`QuoteStore::random_quote`] in this session.
    pub fn last_viewed(&self) -> Option<Quote> {
        let raw = self.session.get(keys::LAST_VIEWED).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }

    /// Forget the session's last-viewed quote.
    pub fn clear_last_viewed(&self) -> Result<()> {
        self.session.remove(keys::LAST_VIEWED)?;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
