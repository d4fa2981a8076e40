//! Player reconciliation
//!
//! Promotes `stg_players` into the player dimension through the same
//! digest-gated reconciler as tournaments. Biographical strings arrive raw
//! from the profile scraper; numeric attributes degrade to absent when
//! malformed rather than failing the row.

use crate::db::models::{Player, Severity, StgPlayer};
use crate::domain::normalize_country_code;
use crate::errors::Result;
use crate::ledger::run_batch;
use crate::reconcile::{clean, parse_int, plan_upserts};
use crate::store::{Store, WriteOp};
use chrono::NaiveDate;
use tracing::info;

pub const MODULE: &str = "process atp players";

/// Reconcile staged players into the dimension table.
///
/// Returns the number of rows actually written.
pub async fn process_players<S>(store: &S, server: &str) -> Result<u64>
where
    S: Store + ?Sized,
{
    run_batch(store, MODULE, server, |batch_id| async move {
        let staged = store.staged_players().await?;
        let existing = store.players().await?;

        let candidates: Vec<Player> = staged.iter().map(resolve).collect();

        let (ops, outcome) = plan_upserts(&existing, candidates, WriteOp::PutPlayer);
        store.apply(batch_id, &ops).await?;

        info!(
            inserted = outcome.inserted,
            updated = outcome.updated,
            skipped = outcome.skipped,
            "players reconciled"
        );
        store
            .append_log(
                batch_id,
                Severity::Info,
                "players upserted",
                Some(outcome.written() as i64),
            )
            .await?;

        Ok(outcome.written())
    })
    .await
}

fn resolve(row: &StgPlayer) -> Player {
    Player {
        code: row.player_code.clone(),
        slug: clean(row.player_slug.as_deref()),
        first_name: clean(row.first_name.as_deref()),
        last_name: clean(row.last_name.as_deref()),
        birthdate: parse_birthdate(row.birthdate.as_deref()),
        birthplace: clean(row.birthplace.as_deref()),
        residence: clean(row.residence.as_deref()),
        flag_code: clean(row.flag_code.as_deref())
            .map(|c| normalize_country_code(&c).to_string()),
        turned_pro: parse_int(row.turned_pro.as_deref()),
        weight_kg: parse_int(row.weight_kg.as_deref()),
        height_cm: parse_int(row.height_cm.as_deref()),
        handedness: clean(row.handedness.as_deref()),
        backhand: clean(row.backhand.as_deref()),
        delta_hash: String::new(),
        batch_id: None,
    }
}

/// Profile birthdates arrive as yyyy/mm/dd.
fn parse_birthdate(value: Option<&str>) -> Option<NaiveDate> {
    clean(value).and_then(|v| NaiveDate::parse_from_str(&v, "%Y/%m/%d").ok())
}
