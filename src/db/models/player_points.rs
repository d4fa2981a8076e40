//! Ranking points entity
//!
//! One row per (tournament, player); written exclusively by the points
//! engine through the digest-gated upsert path. Zero totals are never
//! stored.

use crate::digest::{Canonical, Fingerprint};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "atp_player_points")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[sea_orm(column_type = "Text")]
    pub tournament_id: String,

    #[sea_orm(primary_key, auto_increment = false)]
    #[sea_orm(column_type = "Text")]
    pub player_code: String,

    pub points: i32,

    #[sea_orm(column_type = "Text")]
    pub delta_hash: String,

    pub batch_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tournament::Entity",
        from = "Column::TournamentId",
        to = "super::tournament::Column::Id"
    )]
    Tournament,
}

impl Related<super::tournament::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tournament.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Fingerprint for Model {
    fn fingerprint(&self, enc: &mut Canonical) {
        enc.text(Some(&self.tournament_id));
        enc.text(Some(&self.player_code));
        enc.int(Some(i64::from(self.points)));
    }
}
