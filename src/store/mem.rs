//! In-memory store backend
//!
//! Mirrors the PostgreSQL backend closely enough that the engines cannot
//! tell them apart: `apply` mutates a cloned state and swaps it in only
//! when every op succeeded, so a failing op leaves the store untouched.
//! Ledger writes bypass that mechanism, matching the production rule that
//! batch rows and logs survive a rolled back run.

use crate::db::models::*;
use crate::errors::{ReconError, Result};
use crate::store::{Store, WriteOp};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Default, Clone)]
struct State {
    batches: BTreeMap<Uuid, Batch>,
    logs: Vec<BatchLog>,
    next_log_id: i64,

    stg_tournaments: Vec<StgTournament>,
    stg_players: Vec<StgPlayer>,
    series_rules: Vec<SeriesRule>,
    points_rules: Vec<PointsRule>,

    tournaments: BTreeMap<String, Tournament>,
    players: BTreeMap<String, Player>,
    matches: BTreeMap<i64, MatchRow>,
    enriched: BTreeMap<i64, EnrichedMatch>,
    player_points: BTreeMap<(String, String), PlayerPoints>,
    team_links: BTreeMap<(String, String), TeamLink>,
}

/// Store backed by process memory
#[derive(Debug, Default)]
pub struct MemStore {
    state: Mutex<State>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Seeding (tests and local development)
    // ========================================================================

    pub async fn seed_staged_tournaments(&self, rows: Vec<StgTournament>) {
        self.state.lock().await.stg_tournaments.extend(rows);
    }

    pub async fn seed_staged_players(&self, rows: Vec<StgPlayer>) {
        self.state.lock().await.stg_players.extend(rows);
    }

    pub async fn seed_series_rules(&self, rows: Vec<SeriesRule>) {
        self.state.lock().await.series_rules.extend(rows);
    }

    pub async fn seed_points_rules(&self, rows: Vec<PointsRule>) {
        self.state.lock().await.points_rules.extend(rows);
    }

    pub async fn seed_tournaments(&self, rows: Vec<Tournament>) {
        let mut state = self.state.lock().await;
        for row in rows {
            state.tournaments.insert(row.id.clone(), row);
        }
    }

    pub async fn seed_players(&self, rows: Vec<Player>) {
        let mut state = self.state.lock().await;
        for row in rows {
            state.players.insert(row.code.clone(), row);
        }
    }

    pub async fn seed_matches(&self, rows: Vec<MatchRow>) {
        let mut state = self.state.lock().await;
        for row in rows {
            state.matches.insert(row.id, row);
        }
    }

    pub async fn seed_enriched(&self, rows: Vec<EnrichedMatch>) {
        let mut state = self.state.lock().await;
        for row in rows {
            state.enriched.insert(row.match_id, row);
        }
    }

    pub async fn seed_player_points(&self, rows: Vec<PlayerPoints>) {
        let mut state = self.state.lock().await;
        for row in rows {
            state
                .player_points
                .insert((row.tournament_id.clone(), row.player_code.clone()), row);
        }
    }

    pub async fn seed_team_links(&self, rows: Vec<TeamLink>) {
        let mut state = self.state.lock().await;
        for row in rows {
            state
                .team_links
                .insert((row.team_id.clone(), row.player_code.clone()), row);
        }
    }

    /// Clear the staging tables, leaving reconciled data in place.
    pub async fn clear_staging(&self) {
        let mut state = self.state.lock().await;
        state.stg_tournaments.clear();
        state.stg_players.clear();
    }
}

#[async_trait]
impl Store for MemStore {
    // ========================================================================
    // Batch ledger
    // ========================================================================

    async fn start_batch(&self, module: &str, server: &str) -> Result<Uuid> {
        let batch_id = Uuid::new_v4();
        let mut state = self.state.lock().await;
        state.batches.insert(
            batch_id,
            Batch {
                id: batch_id,
                module: module.to_string(),
                server: server.to_string(),
                status: String::from(BatchStatus::Running),
                start_dtm: chrono::Utc::now().into(),
                end_dtm: None,
            },
        );
        Ok(batch_id)
    }

    async fn append_log(
        &self,
        batch_id: Uuid,
        severity: Severity,
        message: &str,
        qty: Option<i64>,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.batches.contains_key(&batch_id) {
            return Err(ReconError::BatchNotFound { id: batch_id });
        }
        state.next_log_id += 1;
        let id = state.next_log_id;
        state.logs.push(BatchLog {
            id,
            batch_id,
            log_dtm: chrono::Utc::now().into(),
            severity: severity.as_str().to_string(),
            message: message.to_string(),
            qty,
        });
        Ok(())
    }

    async fn finish_batch(&self, batch_id: Uuid, status: BatchStatus) -> Result<()> {
        let mut state = self.state.lock().await;
        let batch = state
            .batches
            .get_mut(&batch_id)
            .ok_or(ReconError::BatchNotFound { id: batch_id })?;
        batch.status = String::from(status);
        batch.end_dtm = Some(chrono::Utc::now().into());
        Ok(())
    }

    async fn find_batch(&self, batch_id: Uuid) -> Result<Option<Batch>> {
        Ok(self.state.lock().await.batches.get(&batch_id).cloned())
    }

    async fn batch_logs(&self, batch_id: Uuid) -> Result<Vec<BatchLog>> {
        Ok(self
            .state
            .lock()
            .await
            .logs
            .iter()
            .filter(|l| l.batch_id == batch_id)
            .cloned()
            .collect())
    }

    // ========================================================================
    // Staging and reference reads
    // ========================================================================

    async fn staged_tournaments(&self) -> Result<Vec<StgTournament>> {
        Ok(self.state.lock().await.stg_tournaments.clone())
    }

    async fn staged_players(&self) -> Result<Vec<StgPlayer>> {
        Ok(self.state.lock().await.stg_players.clone())
    }

    async fn series_rule_map(&self) -> Result<HashMap<String, i32>> {
        Ok(self
            .state
            .lock()
            .await
            .series_rules
            .iter()
            .map(|r| (r.series.clone(), r.points_rule_id))
            .collect())
    }

    async fn points_rules(&self) -> Result<Vec<PointsRule>> {
        Ok(self.state.lock().await.points_rules.clone())
    }

    // ========================================================================
    // Reconciled reads
    // ========================================================================

    async fn tournaments(&self) -> Result<Vec<Tournament>> {
        Ok(self.state.lock().await.tournaments.values().cloned().collect())
    }

    async fn players(&self) -> Result<Vec<Player>> {
        Ok(self.state.lock().await.players.values().cloned().collect())
    }

    async fn find_player(&self, code: &str) -> Result<Option<Player>> {
        Ok(self.state.lock().await.players.get(code).cloned())
    }

    async fn matches(&self) -> Result<Vec<MatchRow>> {
        Ok(self.state.lock().await.matches.values().cloned().collect())
    }

    async fn matches_for_player(&self, code: &str) -> Result<Vec<MatchRow>> {
        Ok(self
            .state
            .lock()
            .await
            .matches
            .values()
            .filter(|m| m.winner_code == code || m.loser_code == code)
            .cloned()
            .collect())
    }

    async fn enriched_for_matches(&self, match_ids: &[i64]) -> Result<Vec<EnrichedMatch>> {
        let state = self.state.lock().await;
        Ok(match_ids
            .iter()
            .filter_map(|id| state.enriched.get(id).cloned())
            .collect())
    }

    async fn player_points(&self) -> Result<Vec<PlayerPoints>> {
        Ok(self
            .state
            .lock()
            .await
            .player_points
            .values()
            .cloned()
            .collect())
    }

    async fn player_points_for(&self, code: &str) -> Result<Vec<PlayerPoints>> {
        Ok(self
            .state
            .lock()
            .await
            .player_points
            .values()
            .filter(|p| p.player_code == code)
            .cloned()
            .collect())
    }

    async fn team_links_for(&self, code: &str) -> Result<Vec<TeamLink>> {
        Ok(self
            .state
            .lock()
            .await
            .team_links
            .values()
            .filter(|l| l.player_code == code)
            .cloned()
            .collect())
    }

    // ========================================================================
    // Atomic write path
    // ========================================================================

    async fn apply(&self, batch_id: Uuid, ops: &[WriteOp]) -> Result<u64> {
        let mut state = self.state.lock().await;

        // All-or-nothing: mutate a copy, swap it in on success.
        let mut next = state.clone();
        let mut affected = 0u64;
        for op in ops {
            affected += apply_op(&mut next, batch_id, op)?;
        }

        *state = next;
        Ok(affected)
    }
}

fn apply_op(state: &mut State, batch_id: Uuid, op: &WriteOp) -> Result<u64> {
    match op {
        WriteOp::PutTournament(row) => {
            let mut row = row.clone();
            row.batch_id = Some(batch_id);
            state.tournaments.insert(row.id.clone(), row);
            Ok(1)
        }

        WriteOp::PutPlayer(row) => {
            let mut row = row.clone();
            row.batch_id = Some(batch_id);
            state.players.insert(row.code.clone(), row);
            Ok(1)
        }

        WriteOp::PutPlayerPoints(row) => {
            let mut row = row.clone();
            row.batch_id = Some(batch_id);
            state
                .player_points
                .insert((row.tournament_id.clone(), row.player_code.clone()), row);
            Ok(1)
        }

        WriteOp::DeletePlayerPoints {
            tournament_id,
            player_code,
        } => {
            let removed = state
                .player_points
                .remove(&(tournament_id.clone(), player_code.clone()));
            Ok(u64::from(removed.is_some()))
        }

        WriteOp::UpdateMatchParticipants {
            id,
            winner_code,
            loser_code,
            delta_hash,
        } => match state.matches.get_mut(id) {
            Some(row) => {
                row.winner_code = winner_code.clone();
                row.loser_code = loser_code.clone();
                row.delta_hash = delta_hash.clone();
                row.batch_id = Some(batch_id);
                Ok(1)
            }
            None => Ok(0),
        },

        WriteOp::UpdateEnrichedParticipants {
            match_id,
            winner_code,
            loser_code,
            delta_hash,
        } => match state.enriched.get_mut(match_id) {
            Some(row) => {
                row.winner_code = winner_code.clone();
                row.loser_code = loser_code.clone();
                row.delta_hash = delta_hash.clone();
                row.batch_id = Some(batch_id);
                Ok(1)
            }
            None => Ok(0),
        },

        WriteOp::ReassignTeamLink {
            team_id,
            from_code,
            to_code,
        } => {
            let from_key = (team_id.clone(), from_code.clone());
            let to_key = (team_id.clone(), to_code.clone());
            if state.team_links.contains_key(&to_key) {
                return Err(ReconError::Integrity {
                    message: format!(
                        "duplicate team link ({team_id}, {to_code}) while reassigning from {from_code}"
                    ),
                });
            }
            match state.team_links.remove(&from_key) {
                Some(mut link) => {
                    link.player_code = to_code.clone();
                    link.batch_id = Some(batch_id);
                    state.team_links.insert(to_key, link);
                    Ok(1)
                }
                None => Ok(0),
            }
        }

        WriteOp::DeletePlayer { code } => {
            let removed = state.players.remove(code);
            Ok(u64::from(removed.is_some()))
        }
    }
}
