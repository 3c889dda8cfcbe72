//! Quote module - Core types and wire encoding
//!
//! The fundamental unit is a [`Quote`]: text, category, and a last-update
//! timestamp, identified by an epoch-millisecond id. Both the id and the
//! timestamp are optional on the wire because legacy collections (and some
//! imports) predate them; the reconciler tolerates their absence.

mod record;

pub use record::{Quote, QuoteDraft};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// The three quotes a fresh (or unreadable) collection is seeded with.
///
/// Seed entries deliberately carry no id and no timestamp: they model the
/// legacy shape the store must keep tolerating, and a remote entry can never
/// displace them (no id means nothing to collide with).
pub fn seed_quotes() -> Vec<Quote> {
    [
        (
            "The best way to predict the future is to start doing hard things.",
            "Motivation",
        ),
        (
            "Do what you can, with what you have, where you are.",
            "Inspiration",
        ),
        (
            "Success is not final, failure is not the end of the world: it's the courage to continue that counts.",
            "Perseverance",
        ),
    ]
    .into_iter()
    .map(|(text, category)| Quote {
        id: None,
        text: text.to_string(),
        category: category.to_string(),
        updated_at: None,
    })
    .collect()
}

/// Parse a wire timestamp leniently.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS`, or a bare `YYYY-MM-DD`
/// (interpreted as midnight UTC). Returns `None` for anything else, which the
/// reconciler treats as minimally old rather than as an error.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

// ============================================================================
// TESTS
// ============================================================================
