//! Reconciliation engines
//!
//! Every engine follows the same shape: read a snapshot through the store
//! seam, compute the writes as plain data, apply them in one transaction
//! under a ledger batch. The keyed reconciler below is the shared
//! digest-gated upsert discipline; the engines supply normalization and
//! business rules on top of it.

pub mod merge;
pub mod players;
pub mod points;
pub mod tournaments;

pub use merge::{merge_players, plan_merge, MergePlan, MergeReport, MergeStep};
pub use players::process_players;
pub use points::apply_points_rules;
pub use tournaments::process_tournaments;

use crate::digest::Fingerprint;
use crate::store::WriteOp;
use std::collections::HashMap;
use std::hash::Hash;

/// Row types the keyed reconciler can drive.
///
/// The key is the natural key of the target table; the stored hash is the
/// digest persisted with the row. Candidates are produced with an empty
/// hash and stamped by the reconciler.
pub trait Keyed: Fingerprint + Clone {
    type Key: Eq + Hash + Clone;

    fn key(&self) -> Self::Key;

    fn stored_hash(&self) -> &str;

    fn set_hash(&mut self, hash: String);
}

/// Outcome counters of one reconciliation pass.
///
/// `written()` is the rows-processed metric logged to the ledger: rows
/// actually inserted or updated, never rows merely scanned.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub inserted: u64,
    pub updated: u64,
    pub skipped: u64,
}

impl UpsertOutcome {
    pub fn written(&self) -> u64 {
        self.inserted + self.updated
    }
}

/// Digest-gated upsert planning over a keyed row set.
///
/// Each candidate's digest is computed over its normalized attributes and
/// compared with the stored row under the same key: missing key inserts,
/// differing digest updates, equal digest skips. The returned ops carry
/// the fresh digest; the store stamps the batch id.
pub fn plan_upserts<T>(
    existing: &[T],
    candidates: Vec<T>,
    wrap: fn(T) -> WriteOp,
) -> (Vec<WriteOp>, UpsertOutcome)
where
    T: Keyed,
{
    let stored: HashMap<T::Key, &str> = existing
        .iter()
        .map(|row| (row.key(), row.stored_hash()))
        .collect();

    let mut ops = Vec::new();
    let mut outcome = UpsertOutcome::default();

    for mut candidate in candidates {
        let hash = candidate.delta_hash();
        match stored.get(&candidate.key()) {
            None => {
                candidate.set_hash(hash);
                ops.push(wrap(candidate));
                outcome.inserted += 1;
            }
            Some(old) if *old != hash => {
                candidate.set_hash(hash);
                ops.push(wrap(candidate));
                outcome.updated += 1;
            }
            Some(_) => outcome.skipped += 1,
        }
    }

    (ops, outcome)
}

// ============================================================================
// Keyed implementations for the reconciled tables
// ============================================================================

impl Keyed for crate::db::models::Tournament {
    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }

    fn stored_hash(&self) -> &str {
        &self.delta_hash
    }

    fn set_hash(&mut self, hash: String) {
        self.delta_hash = hash;
    }
}

impl Keyed for crate::db::models::Player {
    type Key = String;

    fn key(&self) -> String {
        self.code.clone()
    }

    fn stored_hash(&self) -> &str {
        &self.delta_hash
    }

    fn set_hash(&mut self, hash: String) {
        self.delta_hash = hash;
    }
}

impl Keyed for crate::db::models::PlayerPoints {
    type Key = (String, String);

    fn key(&self) -> (String, String) {
        (self.tournament_id.clone(), self.player_code.clone())
    }

    fn stored_hash(&self) -> &str {
        &self.delta_hash
    }

    fn set_hash(&mut self, hash: String) {
        self.delta_hash = hash;
    }
}

/// Trim a scraped string attribute, mapping empty to absent.
pub(crate) fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse a scraped integer attribute; malformed values degrade to absent.
pub(crate) fn parse_int(value: Option<&str>) -> Option<i32> {
    clean(value).and_then(|v| v.parse().ok())
}
