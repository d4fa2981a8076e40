//! Player dimension entity

use crate::digest::{Canonical, Fingerprint};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "atp_players")]
pub struct Model {
    /// ATP player code, e.g. "f0fv"
    #[sea_orm(primary_key, auto_increment = false)]
    #[sea_orm(column_type = "Text")]
    pub code: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub slug: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub first_name: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub last_name: Option<String>,

    pub birthdate: Option<Date>,

    #[sea_orm(column_type = "Text", nullable)]
    pub birthplace: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub residence: Option<String>,

    /// ISO-3166 alpha-3 nationality code
    #[sea_orm(column_type = "Text", nullable)]
    pub flag_code: Option<String>,

    pub turned_pro: Option<i32>,

    pub weight_kg: Option<i32>,

    pub height_cm: Option<i32>,

    #[sea_orm(column_type = "Text", nullable)]
    pub handedness: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub backhand: Option<String>,

    /// Digest used for coalesce-merge tracking
    #[sea_orm(column_type = "Text")]
    pub delta_hash: String,

    pub batch_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Fingerprint for Model {
    fn fingerprint(&self, enc: &mut Canonical) {
        enc.text(self.slug.as_deref());
        enc.text(self.first_name.as_deref());
        enc.text(self.last_name.as_deref());
        enc.date(self.birthdate);
        enc.text(self.birthplace.as_deref());
        enc.text(self.residence.as_deref());
        enc.text(self.flag_code.as_deref());
        enc.int(self.turned_pro.map(i64::from));
        enc.int(self.weight_kg.map(i64::from));
        enc.int(self.height_cm.map(i64::from));
        enc.text(self.handedness.as_deref());
        enc.text(self.backhand.as_deref());
    }
}
