//! Batch log entity
//!
//! Append-only audit lines tied to a batch. `qty` records an affected-row
//! count when the line reports one.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Audit line severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "batch_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub batch_id: Uuid,

    pub log_dtm: DateTimeWithTimeZone,

    #[sea_orm(column_type = "Text")]
    pub severity: String,

    #[sea_orm(column_type = "Text")]
    pub message: String,

    /// Affected-row count, when the line reports one
    pub qty: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::batch::Entity",
        from = "Column::BatchId",
        to = "super::batch::Column::Id"
    )]
    Batch,
}

impl Related<super::batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
