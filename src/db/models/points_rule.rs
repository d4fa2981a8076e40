//! Points rulebook entity
//!
//! Declarative read-only mapping from (rulebook, stadie, result) to a
//! point value. Populated by hand, never written by this core.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "points_rules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub points_rule_id: i32,

    #[sea_orm(primary_key, auto_increment = false)]
    #[sea_orm(column_type = "Text")]
    pub stadie_id: String,

    /// "W" or "L"
    #[sea_orm(primary_key, auto_increment = false)]
    #[sea_orm(column_type = "Text")]
    pub result: String,

    pub points: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
