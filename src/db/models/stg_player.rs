//! Staged player entity
//!
//! Raw biographical rows as scraped from player profiles. Read-only to the
//! reconciliation core.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stg_players")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[sea_orm(column_type = "Text")]
    pub player_code: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub player_slug: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub first_name: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub last_name: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub flag_code: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub residence: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub birthplace: Option<String>,

    /// yyyy/mm/dd as scraped from the profile page
    #[sea_orm(column_type = "Text", nullable)]
    pub birthdate: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub turned_pro: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub weight_kg: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub height_cm: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub handedness: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub backhand: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
