//! Filter/Query - category-filtered views over a collection
//!
//! Stateless derivation plus one piece of state: the last-selected category
//! is persisted (as a plain string) so a restarted UI comes back showing the
//! same slice.

use std::sync::Arc;

use tracing::warn;

use crate::persist::{self, KeyValueStore, keys};
use crate::quote::Quote;

/// The pseudo-category that selects every quote.
pub const ALL_CATEGORIES: &str = "all";

/// Quotes in `category`, relative order preserved.
///
/// [`ALL_CATEGORIES`] yields the whole collection; anything else is an exact,
/// case-sensitive match.
pub fn filter_by_category(quotes: &[Quote], category: &str) -> Vec<Quote> {
    if category == ALL_CATEGORIES {
        return quotes.to_vec();
    }
    quotes
        .iter()
        .filter(|quote| quote.category == category)
        .cloned()
        .collect()
}

/// Category selection with a persisted preference.
pub struct CategoryView {
    prefs: Arc<dyn KeyValueStore>,
}

impl CategoryView {
    /// View over the given preference store (normally the same durable store
    /// the collection lives in).
    pub fn new(prefs: Arc<dyn KeyValueStore>) -> Self {
        Self { prefs }
    }

    /// The persisted selection, defaulting to [`ALL_CATEGORIES`].
    ///
    /// An unreadable preference falls back to the default; losing a filter
    /// selection is never worth an error.
    pub fn selected(&self) -> String {
        match self.prefs.get(keys::SELECTED_CATEGORY) {
            Ok(Some(category)) => category,
            Ok(None) => ALL_CATEGORIES.to_string(),
            Err(e) => {
                warn!("category preference unreadable, defaulting to '{ALL_CATEGORIES}': {e}");
                ALL_CATEGORIES.to_string()
            }
        }
    }

    /// Persist a new selection.
    pub fn select(&self, category: &str) -> persist::Result<()> {
        self.prefs.set(keys::SELECTED_CATEGORY, category)
    }

    /// Apply the persisted selection to a collection.
    pub fn apply(&self, quotes: &[Quote]) -> Vec<Quote> {
        filter_by_category(quotes, &self.selected())
    }
}

// ============================================================================
// TESTS
// ============================================================================
