//! Enriched match entity
//!
//! Derived per-match aggregates kept in the same surrogate key space as
//! `atp_matches`. The stats loader owns the aggregate columns; this core
//! only rewrites the denormalized participant codes when a merge changes
//! the underlying match.

use crate::digest::{Canonical, Fingerprint};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "atp_matches_enriched")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub match_id: i64,

    #[sea_orm(column_type = "Text")]
    pub tournament_id: String,

    #[sea_orm(column_type = "Text")]
    pub winner_code: String,

    #[sea_orm(column_type = "Text")]
    pub loser_code: String,

    pub winner_sets_won: Option<i32>,

    pub loser_sets_won: Option<i32>,

    pub winner_games_won: Option<i32>,

    pub loser_games_won: Option<i32>,

    pub winner_tiebreaks_won: Option<i32>,

    pub loser_tiebreaks_won: Option<i32>,

    #[sea_orm(column_type = "Text")]
    pub delta_hash: String,

    pub batch_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::atp_match::Entity",
        from = "Column::MatchId",
        to = "super::atp_match::Column::Id"
    )]
    Match,
}

impl Related<super::atp_match::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Match.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Fingerprint for Model {
    fn fingerprint(&self, enc: &mut Canonical) {
        enc.text(Some(&self.tournament_id));
        enc.text(Some(&self.winner_code));
        enc.text(Some(&self.loser_code));
        enc.int(self.winner_sets_won.map(i64::from));
        enc.int(self.loser_sets_won.map(i64::from));
        enc.int(self.winner_games_won.map(i64::from));
        enc.int(self.loser_games_won.map(i64::from));
        enc.int(self.winner_tiebreaks_won.map(i64::from));
        enc.int(self.loser_tiebreaks_won.map(i64::from));
    }
}
