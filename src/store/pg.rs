//! PostgreSQL store backend
//!
//! SeaORM implementation of the store seam. Every `apply` call runs inside
//! a native transaction; constraint violations surface as store errors and
//! roll the whole run back.

use crate::db::models::*;
use crate::errors::{ReconError, Result};
use crate::store::{Store, WriteOp};
use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

/// Store backed by the PostgreSQL warehouse
#[derive(Clone)]
pub struct PgStore {
    db: DatabaseConnection,
}

impl PgStore {
    /// Wrap an established connection.
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connect from configuration.
    pub async fn connect(config: &crate::config::DatabaseConfig) -> Result<Self> {
        Ok(Self::new(crate::db::connect(config).await?))
    }
}

#[async_trait]
impl Store for PgStore {
    // ========================================================================
    // Batch ledger
    // ========================================================================

    async fn start_batch(&self, module: &str, server: &str) -> Result<Uuid> {
        let batch_id = Uuid::new_v4();
        let now = chrono::Utc::now();

        let batch = BatchActiveModel {
            id: Set(batch_id),
            module: Set(module.to_string()),
            server: Set(server.to_string()),
            status: Set(String::from(BatchStatus::Running)),
            start_dtm: Set(now.into()),
            end_dtm: Set(None),
        };

        batch.insert(&self.db).await?;
        Ok(batch_id)
    }

    async fn append_log(
        &self,
        batch_id: Uuid,
        severity: Severity,
        message: &str,
        qty: Option<i64>,
    ) -> Result<()> {
        let line = BatchLogActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            batch_id: Set(batch_id),
            log_dtm: Set(chrono::Utc::now().into()),
            severity: Set(severity.as_str().to_string()),
            message: Set(message.to_string()),
            qty: Set(qty),
        };

        line.insert(&self.db).await?;
        Ok(())
    }

    async fn finish_batch(&self, batch_id: Uuid, status: BatchStatus) -> Result<()> {
        let result = BatchEntity::update_many()
            .col_expr(BatchColumn::Status, Expr::value(String::from(status)))
            .col_expr(
                BatchColumn::EndDtm,
                Expr::value(Some(sea_orm::prelude::DateTimeWithTimeZone::from(
                    chrono::Utc::now(),
                ))),
            )
            .filter(BatchColumn::Id.eq(batch_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ReconError::BatchNotFound { id: batch_id });
        }
        Ok(())
    }

    async fn find_batch(&self, batch_id: Uuid) -> Result<Option<Batch>> {
        BatchEntity::find_by_id(batch_id)
            .one(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn batch_logs(&self, batch_id: Uuid) -> Result<Vec<BatchLog>> {
        BatchLogEntity::find()
            .filter(BatchLogColumn::BatchId.eq(batch_id))
            .order_by_asc(BatchLogColumn::Id)
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Staging and reference reads
    // ========================================================================

    async fn staged_tournaments(&self) -> Result<Vec<StgTournament>> {
        StgTournamentEntity::find()
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn staged_players(&self) -> Result<Vec<StgPlayer>> {
        StgPlayerEntity::find()
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn series_rule_map(&self) -> Result<HashMap<String, i32>> {
        let rows = SeriesRuleEntity::find().all(&self.db).await?;
        Ok(rows
            .into_iter()
            .map(|r| (r.series, r.points_rule_id))
            .collect())
    }

    async fn points_rules(&self) -> Result<Vec<PointsRule>> {
        PointsRuleEntity::find()
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Reconciled reads
    // ========================================================================

    async fn tournaments(&self) -> Result<Vec<Tournament>> {
        TournamentEntity::find()
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn players(&self) -> Result<Vec<Player>> {
        PlayerEntity::find().all(&self.db).await.map_err(Into::into)
    }

    async fn find_player(&self, code: &str) -> Result<Option<Player>> {
        PlayerEntity::find_by_id(code.to_string())
            .one(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn matches(&self) -> Result<Vec<MatchRow>> {
        MatchEntity::find().all(&self.db).await.map_err(Into::into)
    }

    async fn matches_for_player(&self, code: &str) -> Result<Vec<MatchRow>> {
        MatchEntity::find()
            .filter(
                Condition::any()
                    .add(MatchColumn::WinnerCode.eq(code))
                    .add(MatchColumn::LoserCode.eq(code)),
            )
            .order_by_asc(MatchColumn::Id)
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn enriched_for_matches(&self, match_ids: &[i64]) -> Result<Vec<EnrichedMatch>> {
        if match_ids.is_empty() {
            return Ok(Vec::new());
        }
        EnrichedMatchEntity::find()
            .filter(EnrichedMatchColumn::MatchId.is_in(match_ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn player_points(&self) -> Result<Vec<PlayerPoints>> {
        PlayerPointsEntity::find()
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn player_points_for(&self, code: &str) -> Result<Vec<PlayerPoints>> {
        PlayerPointsEntity::find()
            .filter(PlayerPointsColumn::PlayerCode.eq(code))
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn team_links_for(&self, code: &str) -> Result<Vec<TeamLink>> {
        TeamLinkEntity::find()
            .filter(TeamLinkColumn::PlayerCode.eq(code))
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Atomic write path
    // ========================================================================

    async fn apply(&self, batch_id: Uuid, ops: &[WriteOp]) -> Result<u64> {
        let txn = self.db.begin().await?;

        let mut affected = 0u64;
        for op in ops {
            affected += apply_op(&txn, batch_id, op).await?;
        }

        txn.commit().await?;
        Ok(affected)
    }
}

/// Execute one op inside the active transaction.
async fn apply_op(txn: &DatabaseTransaction, batch_id: Uuid, op: &WriteOp) -> Result<u64> {
    match op {
        WriteOp::PutTournament(row) => {
            let mut row = row.clone();
            row.batch_id = Some(batch_id);
            TournamentEntity::insert(row.into_active_model().reset_all())
                .on_conflict(
                    OnConflict::column(TournamentColumn::Id)
                        .update_columns([
                            TournamentColumn::Name,
                            TournamentColumn::Year,
                            TournamentColumn::Code,
                            TournamentColumn::Location,
                            TournamentColumn::CountryName,
                            TournamentColumn::IndoorOutdoor,
                            TournamentColumn::Surface,
                            TournamentColumn::Series,
                            TournamentColumn::StartDtm,
                            TournamentColumn::FinishDtm,
                            TournamentColumn::SglDrawQty,
                            TournamentColumn::DblDrawQty,
                            TournamentColumn::PrizeMoney,
                            TournamentColumn::PrizeCurrency,
                            TournamentColumn::PointsRuleId,
                            TournamentColumn::DrawTemplateId,
                            TournamentColumn::DeltaHash,
                            TournamentColumn::BatchId,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(txn)
                .await?;
            Ok(1)
        }

        WriteOp::PutPlayer(row) => {
            let mut row = row.clone();
            row.batch_id = Some(batch_id);
            PlayerEntity::insert(row.into_active_model().reset_all())
                .on_conflict(
                    OnConflict::column(PlayerColumn::Code)
                        .update_columns([
                            PlayerColumn::Slug,
                            PlayerColumn::FirstName,
                            PlayerColumn::LastName,
                            PlayerColumn::Birthdate,
                            PlayerColumn::Birthplace,
                            PlayerColumn::Residence,
                            PlayerColumn::FlagCode,
                            PlayerColumn::TurnedPro,
                            PlayerColumn::WeightKg,
                            PlayerColumn::HeightCm,
                            PlayerColumn::Handedness,
                            PlayerColumn::Backhand,
                            PlayerColumn::DeltaHash,
                            PlayerColumn::BatchId,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(txn)
                .await?;
            Ok(1)
        }

        WriteOp::PutPlayerPoints(row) => {
            let mut row = row.clone();
            row.batch_id = Some(batch_id);
            PlayerPointsEntity::insert(row.into_active_model().reset_all())
                .on_conflict(
                    OnConflict::columns([
                        PlayerPointsColumn::TournamentId,
                        PlayerPointsColumn::PlayerCode,
                    ])
                    .update_columns([
                        PlayerPointsColumn::Points,
                        PlayerPointsColumn::DeltaHash,
                        PlayerPointsColumn::BatchId,
                    ])
                    .to_owned(),
                )
                .exec_without_returning(txn)
                .await?;
            Ok(1)
        }

        WriteOp::DeletePlayerPoints {
            tournament_id,
            player_code,
        } => {
            let result = PlayerPointsEntity::delete_many()
                .filter(PlayerPointsColumn::TournamentId.eq(tournament_id))
                .filter(PlayerPointsColumn::PlayerCode.eq(player_code))
                .exec(txn)
                .await?;
            Ok(result.rows_affected)
        }

        WriteOp::UpdateMatchParticipants {
            id,
            winner_code,
            loser_code,
            delta_hash,
        } => {
            let result = MatchEntity::update_many()
                .col_expr(MatchColumn::WinnerCode, Expr::value(winner_code.clone()))
                .col_expr(MatchColumn::LoserCode, Expr::value(loser_code.clone()))
                .col_expr(MatchColumn::DeltaHash, Expr::value(delta_hash.clone()))
                .col_expr(MatchColumn::BatchId, Expr::value(Some(batch_id)))
                .filter(MatchColumn::Id.eq(*id))
                .exec(txn)
                .await?;
            Ok(result.rows_affected)
        }

        WriteOp::UpdateEnrichedParticipants {
            match_id,
            winner_code,
            loser_code,
            delta_hash,
        } => {
            let result = EnrichedMatchEntity::update_many()
                .col_expr(
                    EnrichedMatchColumn::WinnerCode,
                    Expr::value(winner_code.clone()),
                )
                .col_expr(
                    EnrichedMatchColumn::LoserCode,
                    Expr::value(loser_code.clone()),
                )
                .col_expr(
                    EnrichedMatchColumn::DeltaHash,
                    Expr::value(delta_hash.clone()),
                )
                .col_expr(EnrichedMatchColumn::BatchId, Expr::value(Some(batch_id)))
                .filter(EnrichedMatchColumn::MatchId.eq(*match_id))
                .exec(txn)
                .await?;
            Ok(result.rows_affected)
        }

        WriteOp::ReassignTeamLink {
            team_id,
            from_code,
            to_code,
        } => {
            let result = TeamLinkEntity::update_many()
                .col_expr(TeamLinkColumn::PlayerCode, Expr::value(to_code.clone()))
                .col_expr(TeamLinkColumn::BatchId, Expr::value(Some(batch_id)))
                .filter(TeamLinkColumn::TeamId.eq(team_id))
                .filter(TeamLinkColumn::PlayerCode.eq(from_code))
                .exec(txn)
                .await?;
            Ok(result.rows_affected)
        }

        WriteOp::DeletePlayer { code } => {
            let result = PlayerEntity::delete_many()
                .filter(PlayerColumn::Code.eq(code))
                .exec(txn)
                .await?;
            Ok(result.rows_affected)
        }
    }
}
