//! Batch ledger entity
//!
//! One row per reconciliation run. Closed with a terminal status and never
//! updated afterward; provenance comes from the batch_id stamped on every
//! row a run writes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Batch lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Running,
    Succeeded,
    Failed,
}

impl From<String> for BatchStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "succeeded" => BatchStatus::Succeeded,
            "failed" => BatchStatus::Failed,
            _ => BatchStatus::Running,
        }
    }
}

impl From<BatchStatus> for String {
    fn from(status: BatchStatus) -> Self {
        match status {
            BatchStatus::Running => "running".to_string(),
            BatchStatus::Succeeded => "succeeded".to_string(),
            BatchStatus::Failed => "failed".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "batches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Module name, e.g. "process atp tournaments"
    #[sea_orm(column_type = "Text")]
    pub module: String,

    /// Origin server/host the run was started from
    #[sea_orm(column_type = "Text")]
    pub server: String,

    #[sea_orm(column_type = "Text")]
    pub status: String,

    pub start_dtm: DateTimeWithTimeZone,

    pub end_dtm: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Get the batch status as an enum
    pub fn batch_status(&self) -> BatchStatus {
        BatchStatus::from(self.status.clone())
    }

    /// Check if the batch reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.batch_status(),
            BatchStatus::Succeeded | BatchStatus::Failed
        )
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::batch_log::Entity")]
    Logs,
}

impl Related<super::batch_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Logs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
