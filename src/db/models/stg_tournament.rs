//! Staged tournament entity
//!
//! Raw rows as loaded by the scraper: everything string-typed except the
//! year. Read-only to the reconciliation core.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stg_tournaments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[sea_orm(column_type = "Text")]
    pub id: String,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    pub year: i32,

    #[sea_orm(column_type = "Text")]
    pub code: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub slug: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub location: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub indoor_outdoor: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub surface: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub series: Option<String>,

    /// dd.mm.yyyy as produced by the scraper
    #[sea_orm(column_type = "Text", nullable)]
    pub start_dtm: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub finish_dtm: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub sgl_draw_qty: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub dbl_draw_qty: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub prize_money: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub prize_currency: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub country_name: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
