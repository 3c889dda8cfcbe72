//! Quote record - the core entity and its wire shape
//!
//! Wire encoding is a JSON object with camelCase fields:
//! `{id: number, text: string, category: string, updatedAt: string}`.
//! `id` and `updatedAt` are omitted when absent so legacy entries round-trip
//! unchanged, and `updatedAt` additionally decodes from numeric epoch
//! milliseconds for remotes that send numbers instead of strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// QUOTE
// ============================================================================

/// A single quote in a collection.
///
/// Quotes are never mutated in place: an update replaces the stored instance
/// under the same id, and the reconciler decides between two instances of the
/// same id purely by `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Epoch-millisecond identifier assigned at creation; `None` for legacy
    /// entries, which are always kept during reconciliation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// The quote text (non-empty for store-created quotes)
    pub text: String,
    /// Category label, matched exactly and case-sensitively by filters
    pub category: String,
    /// When this instance was last written; `None` compares older than any
    /// timestamp, so an untimestamped entry never overwrites a timestamped one
    #[serde(
        default,
        with = "wire_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Quote {
    /// Whether this instance should replace `other` under last-write-wins.
    ///
    /// Strictly greater only: equal timestamps (and both-missing timestamps)
    /// keep `other`, so the existing local entry wins ties. `Option`'s
    /// ordering puts `None` before any `Some`, which is exactly the
    /// "missing timestamp is minimally old" rule.
    pub fn supersedes(&self, other: &Quote) -> bool {
        self.updated_at > other.updated_at
    }
}

// ============================================================================
// DRAFT INPUT
// ============================================================================

/// Input for creating a new quote via the store.
///
/// Validation (non-empty text and category after trimming) happens in
/// `QuoteStore::add`, which also assigns the id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDraft {
    /// The quote text
    pub text: String,
    /// Category label
    pub category: String,
}

impl QuoteDraft {
    /// Create a draft from anything string-like
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }
}

// ============================================================================
// WIRE TIMESTAMP
// ============================================================================

/// Serde adapter for `updatedAt`: RFC 3339 out, lenient in.
///
/// Decoding accepts an RFC 3339 string, a naive datetime or bare date, or
/// numeric epoch milliseconds. Unparseable values become `None` (minimally
/// old) instead of failing the whole collection.
mod wire_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Millis(i64),
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Millis(ms)) => Ok(DateTime::from_timestamp_millis(ms)),
            Some(Raw::Text(text)) => Ok(crate::quote::parse_timestamp(&text)),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
