//! Mock collaborators for journey tests.
//!
//! `ScriptedRemote` replays a fixed sequence of fetch responses and records
//! every posted quote, so tests can script an unreliable network without
//! touching one. It is `Clone` (shared inner state) so the same script can be
//! handed to a scheduler and inspected from the test afterwards.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use quotesync_core::{MemoryStore, Quote, QuoteStore, RemoteError, RemoteQuotes};

// ============================================================================
// SCRIPTED REMOTE
// ============================================================================

/// Remote double replaying a scripted sequence of fetch responses.
///
/// Responses are consumed front to back; once the script is exhausted every
/// further fetch fails with [`RemoteError::Unavailable`]. An optional fetch
/// delay lets tests hold a sync cycle open under `start_paused` time.
#[derive(Clone, Default)]
pub struct ScriptedRemote {
    inner: Arc<RemoteInner>,
}

#[derive(Default)]
struct RemoteInner {
    responses: Mutex<VecDeque<Result<Vec<Quote>, RemoteError>>>,
    posted: Mutex<Vec<Quote>>,
    fetch_calls: AtomicUsize,
    fetch_delay: Mutex<Option<Duration>>,
}

impl ScriptedRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next fetch response.
    pub fn push_fetch(&self, response: Result<Vec<Quote>, RemoteError>) {
        self.lock(&self.inner.responses).push_back(response);
    }

    /// Make every fetch sleep before answering.
    pub fn set_fetch_delay(&self, delay: Duration) {
        *self.lock(&self.inner.fetch_delay) = Some(delay);
    }

    /// How many times `fetch_collection` has been called.
    pub fn fetch_calls(&self) -> usize {
        self.inner.fetch_calls.load(Ordering::SeqCst)
    }

    /// Every quote offered via `post_quote`, in order.
    pub fn posted(&self) -> Vec<Quote> {
        self.lock(&self.inner.posted).clone()
    }

    fn lock<'a, T>(&self, mutex: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RemoteQuotes for ScriptedRemote {
    async fn fetch_collection(&self) -> Result<Vec<Quote>, RemoteError> {
        self.inner.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.lock(&self.inner.fetch_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.lock(&self.inner.responses)
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::Unavailable("script exhausted".to_string())))
    }

    async fn post_quote(&self, quote: &Quote) -> Result<(), RemoteError> {
        self.lock(&self.inner.posted).push(quote.clone());
        Ok(())
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

/// Parse a `YYYY-MM-DD` date into a UTC timestamp.
pub fn ts(date: &str) -> Option<DateTime<Utc>> {
    date.parse::<chrono::NaiveDate>()
        .ok()
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap().and_utc())
}

/// A fully-stamped quote, dated at midnight UTC on the given day.
pub fn dated_quote(id: i64, text: &str, category: &str, date: &str) -> Quote {
    Quote {
        id: Some(id),
        text: text.to_string(),
        category: category.to_string(),
        updated_at: ts(date),
    }
}

/// A legacy-shaped quote: no id, no timestamp.
pub fn legacy_quote(text: &str, category: &str) -> Quote {
    Quote {
        id: None,
        text: text.to_string(),
        category: category.to_string(),
        updated_at: None,
    }
}

/// A store over fresh in-memory persistence, loaded (and therefore seeded).
pub fn seeded_store() -> Arc<QuoteStore> {
    let store = Arc::new(QuoteStore::new(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryStore::new()),
    ));
    store.load();
    store
}
