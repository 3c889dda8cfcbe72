//! Reconciler - pure last-write-wins merge of two quote collections
//!
//! Combines a local and a remote collection into one deduplicated collection:
//! union by id, conflicts resolved by `updatedAt` recency with the local entry
//! winning ties. No I/O and no errors; entries without an id are passed
//! through untouched rather than rejected.

use std::collections::HashMap;

use crate::quote::Quote;

/// Merge `remote` into `local`, last write wins.
///
/// Rules:
/// - A remote id unseen locally is inserted.
/// - A remote id already present replaces the local entry only when the
///   remote `updated_at` is strictly greater; missing timestamps compare
///   older than any timestamp.
/// - Local entries with no remote counterpart are retained (union, not
///   intersection).
/// - Entries lacking an id (legacy or malformed) cannot collide and are kept.
///
/// Output order is deterministic for equal inputs: local order first, then
/// previously-unseen remote entries in remote order.
pub fn merge(local: &[Quote], remote: &[Quote]) -> Vec<Quote> {
    let mut merged: Vec<Quote> = local.to_vec();

    let mut by_id: HashMap<i64, usize> = HashMap::with_capacity(merged.len());
    for (index, quote) in merged.iter().enumerate() {
        if let Some(id) = quote.id {
            by_id.insert(id, index);
        }
    }

    for incoming in remote {
        match incoming.id {
            Some(id) => match by_id.get(&id) {
                Some(&index) => {
                    if incoming.supersedes(&merged[index]) {
                        merged[index] = incoming.clone();
                    }
                }
                None => {
                    by_id.insert(id, merged.len());
                    merged.push(incoming.clone());
                }
            },
            // No id, nothing to collide with
            None => merged.push(incoming.clone()),
        }
    }

    merged
}

// ============================================================================
// TESTS
// ============================================================================
