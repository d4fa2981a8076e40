//! Match entity
//!
//! Matches carry a stable surrogate id; participant codes are ordinary
//! foreign keys. An identity merge therefore updates the code columns in
//! place and never rewrites keys. The legacy composite identity
//! (tournament, participants, stadie) is derivable via `composite_key()`
//! for log readability but is never stored as a key.

use crate::digest::{Canonical, Fingerprint};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "atp_matches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(column_type = "Text")]
    pub tournament_id: String,

    /// Stadie code: F, SF, QF, R16..R128, RR, BR, Q1..Q3
    #[sea_orm(column_type = "Text")]
    pub stadie_id: String,

    /// main_draw or qual_draw
    #[sea_orm(column_type = "Text")]
    pub draw_type: String,

    pub match_order: Option<i32>,

    #[sea_orm(column_type = "Text")]
    pub winner_code: String,

    #[sea_orm(column_type = "Text")]
    pub loser_code: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub score: Option<String>,

    /// (RET), (W/O), (WEA) or null for a completed match
    #[sea_orm(column_type = "Text", nullable)]
    pub match_ret: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub delta_hash: String,

    pub batch_id: Option<Uuid>,
}

impl Model {
    /// Legacy composite identity, for logging and cross-checks only.
    pub fn composite_key(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.tournament_id, self.winner_code, self.loser_code, self.stadie_id
        )
    }
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
        enc.text(Some(&self.stadie_id));
        enc.text(Some(&self.draw_type));
        enc.int(self.match_order.map(i64::from));
        enc.text(Some(&self.winner_code));
        enc.text(Some(&self.loser_code));
        enc.text(self.score.as_deref());
        enc.text(self.match_ret.as_deref());
    }
}
