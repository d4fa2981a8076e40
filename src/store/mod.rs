//! Store seam for the reconciliation engines
//!
//! The engines read snapshots, compute their writes as plain data
//! (`WriteOp`), and hand the whole set to `Store::apply`, which executes it
//! as one transaction stamped with the active batch id. Provenance and
//! atomicity are never decoupled: there is no mutating path outside
//! `apply` except the ledger itself, whose writes must survive a rolled
//! back run.
//!
//! Backends:
//! - `PgStore`: PostgreSQL via SeaORM (production)
//! - `MemStore`: in-memory (tests and local development)

mod mem;
mod pg;

pub use mem::MemStore;
pub use pg::PgStore;

use crate::db::models::{
    Batch, BatchLog, BatchStatus, EnrichedMatch, MatchRow, Player, PlayerPoints, PointsRule,
    Severity, StgPlayer, StgTournament, TeamLink, Tournament,
};
use crate::errors::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// A single write against the warehouse, applied inside `Store::apply`.
///
/// `Put*` variants are key-based upserts of a full row; `Update*` variants
/// are targeted column rewrites used by the identity merge. The batch id is
/// stamped onto every touched row by the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    PutTournament(Tournament),
    PutPlayer(Player),
    PutPlayerPoints(PlayerPoints),
    DeletePlayerPoints {
        tournament_id: String,
        player_code: String,
    },
    UpdateMatchParticipants {
        id: i64,
        winner_code: String,
        loser_code: String,
        delta_hash: String,
    },
    UpdateEnrichedParticipants {
        match_id: i64,
        winner_code: String,
        loser_code: String,
        delta_hash: String,
    },
    ReassignTeamLink {
        team_id: String,
        from_code: String,
        to_code: String,
    },
    DeletePlayer {
        code: String,
    },
}

/// Read/write access to the warehouse for one reconciliation run.
#[async_trait]
pub trait Store: Send + Sync {
    // ========================================================================
    // Batch ledger
    // ========================================================================

    /// Open a new running batch and return its id.
    async fn start_batch(&self, module: &str, server: &str) -> Result<Uuid>;

    /// Append an audit line to a batch.
    async fn append_log(
        &self,
        batch_id: Uuid,
        severity: Severity,
        message: &str,
        qty: Option<i64>,
    ) -> Result<()>;

    /// Close a batch with a terminal status.
    async fn finish_batch(&self, batch_id: Uuid, status: BatchStatus) -> Result<()>;

    /// Fetch a batch record.
    async fn find_batch(&self, batch_id: Uuid) -> Result<Option<Batch>>;

    /// Fetch the audit lines of a batch, in append order.
    async fn batch_logs(&self, batch_id: Uuid) -> Result<Vec<BatchLog>>;

    // ========================================================================
    // Staging and reference reads
    // ========================================================================

    async fn staged_tournaments(&self) -> Result<Vec<StgTournament>>;

    async fn staged_players(&self) -> Result<Vec<StgPlayer>>;

    /// Series category to points rulebook id.
    async fn series_rule_map(&self) -> Result<HashMap<String, i32>>;

    async fn points_rules(&self) -> Result<Vec<PointsRule>>;

    // ========================================================================
    // Reconciled reads
    // ========================================================================

    async fn tournaments(&self) -> Result<Vec<Tournament>>;

    async fn players(&self) -> Result<Vec<Player>>;

    async fn find_player(&self, code: &str) -> Result<Option<Player>>;

    async fn matches(&self) -> Result<Vec<MatchRow>>;

    /// Matches where the player appears as winner or loser.
    async fn matches_for_player(&self, code: &str) -> Result<Vec<MatchRow>>;

    async fn enriched_for_matches(&self, match_ids: &[i64]) -> Result<Vec<EnrichedMatch>>;

    async fn player_points(&self) -> Result<Vec<PlayerPoints>>;

    async fn player_points_for(&self, code: &str) -> Result<Vec<PlayerPoints>>;

    async fn team_links_for(&self, code: &str) -> Result<Vec<TeamLink>>;

    // ========================================================================
    // Atomic write path
    // ========================================================================

    /// Apply every op in one transaction, stamping `batch_id` on touched
    /// rows. Returns the number of rows affected. Any failure rolls the
    /// whole set back.
    async fn apply(&self, batch_id: Uuid, ops: &[WriteOp]) -> Result<u64>;
}
