//! Persistence collaborators
//!
//! The core never touches durable storage directly; it goes through the
//! [`KeyValueStore`] trait, a deliberately narrow `get`/`set`/`remove`
//! surface over string keys and string values. Two implementations ship:
//! [`MemoryStore`] (also used as the session-lifetime store, cleared when it
//! is dropped) and [`SqliteStore`] (a single-table SQLite database).

mod sqlite;

pub use sqlite::SqliteStore;

use std::collections::HashMap;
use std::sync::Mutex;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Persistence error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Initialization error
    #[error("initialization error: {0}")]
    Init(String),
}

/// Persistence result type
pub type Result<T> = std::result::Result<T, PersistError>;

// ============================================================================
// KEYS
// ============================================================================

/// Well-known keys the core reads and writes.
///
/// Names match the original browser-storage keys so an exported collection
/// stays recognizable across implementations.
pub mod keys {
    /// Serialized quote collection (durable store)
    pub const QUOTES: &str = "quotesStorage";
    /// Last-selected category filter (durable store)
    pub const SELECTED_CATEGORY: &str = "selectedCategory";
    /// Last randomly shown quote (session store)
    pub const LAST_VIEWED: &str = "lastViewedQuote";
}

// ============================================================================
// KEY-VALUE STORE TRAIT
// ============================================================================

/// Narrow key-value persistence surface.
///
/// Implementations own the durable encoding; the core only ever hands them
/// opaque strings. All methods are fallible so write failures can surface to
/// the caller, but callers treat durability as best-effort: in-memory state
/// remains the source of truth.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `Ok(None)` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Write (or overwrite) a value
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Delete a key; deleting an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// In-memory key-value store.
///
/// Backs tests and the session-lifetime store: contents vanish when the
/// value is dropped, which is exactly the session-storage contract.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // Poisoning only matters if a panic escaped a critical section; the
        // map is still coherent, so keep serving it.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
