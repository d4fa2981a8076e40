//! Tournament dimension entity

use crate::digest::{Canonical, Fingerprint};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "atp_tournaments")]
pub struct Model {
    /// Natural key: "{year}-{code}"
    #[sea_orm(primary_key, auto_increment = false)]
    #[sea_orm(column_type = "Text")]
    pub id: String,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    pub year: i32,

    #[sea_orm(column_type = "Text")]
    pub code: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub location: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub country_name: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub indoor_outdoor: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub surface: Option<String>,

    /// Series category: gs, 1000, atp500, atp250, atpFinal, ch100, ...
    #[sea_orm(column_type = "Text", nullable)]
    pub series: Option<String>,

    pub start_dtm: Option<Date>,

    pub finish_dtm: Option<Date>,

    pub sgl_draw_qty: Option<i32>,

    pub dbl_draw_qty: Option<i32>,

    pub prize_money: Option<i64>,

    #[sea_orm(column_type = "Text", nullable)]
    pub prize_currency: Option<String>,

    /// Reference into the ranking-points rulebook
    pub points_rule_id: Option<i32>,

    /// Symbolic bracket-template code (e.g. R32-Q8, RR8)
    #[sea_orm(column_type = "Text", nullable)]
    pub draw_template_id: Option<String>,

    /// Digest of the tracked attributes; gates every write
    #[sea_orm(column_type = "Text")]
    pub delta_hash: String,

    /// Batch that last touched this row
    pub batch_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::atp_match::Entity")]
    Matches,

    #[sea_orm(has_many = "super::player_points::Entity")]
    PlayerPoints,
}

impl Related<super::atp_match::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Matches.def()
    }
}

impl Related<super::player_points::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlayerPoints.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Fingerprint for Model {
    fn fingerprint(&self, enc: &mut Canonical) {
        enc.text(Some(&self.name));
        enc.int(Some(i64::from(self.year)));
        enc.text(Some(&self.code));
        enc.text(self.location.as_deref());
        enc.text(self.country_name.as_deref());
        enc.text(self.indoor_outdoor.as_deref());
        enc.text(self.surface.as_deref());
        enc.text(self.series.as_deref());
        enc.date(self.start_dtm);
        enc.date(self.finish_dtm);
        enc.int(self.sgl_draw_qty.map(i64::from));
        enc.int(self.dbl_draw_qty.map(i64::from));
        enc.int(self.prize_money);
        enc.text(self.prize_currency.as_deref());
        enc.int(self.points_rule_id.map(i64::from));
        enc.text(self.draw_template_id.as_deref());
    }
}
