//! Tournament reconciliation
//!
//! Promotes `stg_tournaments` into the tournament dimension: normalize the
//! scraped strings, resolve the points rulebook from the series lookup,
//! classify the draw template, then run the rows through the digest-gated
//! reconciler. Existing manual values win over re-derived lookups.

use crate::db::models::{Severity, StgTournament, Tournament};
use crate::domain::normalize_country_name;
use crate::errors::Result;
use crate::ledger::run_batch;
use crate::reconcile::{clean, parse_int, plan_upserts};
use crate::rules::{classify_draw_template, DrawFacts};
use crate::store::{Store, WriteOp};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{info, warn};

pub const MODULE: &str = "process atp tournaments";

/// Reconcile staged tournaments into the dimension table.
///
/// Returns the number of rows actually written.
pub async fn process_tournaments<S>(store: &S, server: &str) -> Result<u64>
where
    S: Store + ?Sized,
{
    run_batch(store, MODULE, server, |batch_id| async move {
        let staged = store.staged_tournaments().await?;
        let existing = store.tournaments().await?;
        let series_rules = store.series_rule_map().await?;

        let by_id: HashMap<&str, &Tournament> =
            existing.iter().map(|t| (t.id.as_str(), t)).collect();

        let candidates: Vec<Tournament> = staged
            .iter()
            .map(|row| resolve(row, by_id.get(row.id.as_str()).copied(), &series_rules))
            .collect();

        let (ops, outcome) = plan_upserts(&existing, candidates, WriteOp::PutTournament);
        store.apply(batch_id, &ops).await?;

        info!(
            inserted = outcome.inserted,
            updated = outcome.updated,
            skipped = outcome.skipped,
            "tournaments reconciled"
        );
        store
            .append_log(
                batch_id,
                Severity::Info,
                "tournaments upserted",
                Some(outcome.written() as i64),
            )
            .await?;

        Ok(outcome.written())
    })
    .await
}

/// Build the dimension row a staged tournament should persist as.
///
/// `existing` carries manual corrections: its rule reference, country and
/// template win over freshly resolved values.
fn resolve(
    row: &StgTournament,
    existing: Option<&Tournament>,
    series_rules: &HashMap<String, i32>,
) -> Tournament {
    let series = clean(row.series.as_deref());

    let resolved_rule = series
        .as_deref()
        .and_then(|s| series_rules.get(s).copied());
    if series.is_some() && resolved_rule.is_none() && existing.and_then(|t| t.points_rule_id).is_none()
    {
        warn!(id = %row.id, series = ?series, "series has no points rulebook entry");
    }

    let resolved_country = clean(row.country_name.as_deref())
        .map(|c| normalize_country_name(&c).to_string());

    let sgl_draw_qty = parse_int(row.sgl_draw_qty.as_deref());

    let facts = DrawFacts {
        series: series.clone(),
        code: row.code.clone(),
        sgl_draw_qty,
    };
    let stored_template = existing.and_then(|t| t.draw_template_id.as_deref());
    let draw_template_id = classify_draw_template(&facts, stored_template);

    Tournament {
        id: row.id.clone(),
        name: row.name.trim().to_string(),
        year: row.year,
        code: row.code.clone(),
        location: clean(row.location.as_deref()),
        country_name: existing
            .and_then(|t| t.country_name.clone())
            .or(resolved_country),
        indoor_outdoor: clean(row.indoor_outdoor.as_deref()),
        surface: clean(row.surface.as_deref()),
        series,
        start_dtm: parse_scraped_date(row.start_dtm.as_deref()),
        finish_dtm: parse_scraped_date(row.finish_dtm.as_deref()),
        sgl_draw_qty,
        dbl_draw_qty: parse_int(row.dbl_draw_qty.as_deref()),
        prize_money: clean(row.prize_money.as_deref()).and_then(|v| v.parse().ok()),
        prize_currency: clean(row.prize_currency.as_deref()),
        points_rule_id: existing
            .and_then(|t| t.points_rule_id)
            .or(resolved_rule),
        draw_template_id,
        delta_hash: String::new(),
        batch_id: None,
    }
}

/// Tournament dates arrive as dd.mm.yyyy; anything else degrades to absent.
fn parse_scraped_date(value: Option<&str>) -> Option<NaiveDate> {
    clean(value).and_then(|v| NaiveDate::parse_from_str(&v, "%d.%m.%Y").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staged(id: &str, series: &str, qty: &str) -> StgTournament {
        StgTournament {
            id: id.into(),
            name: "Qatar ExxonMobil Open".into(),
            year: 2024,
            code: id.split('-').nth(1).unwrap_or("451").into(),
            slug: Some("doha".into()),
            location: Some(" Doha ".into()),
            indoor_outdoor: Some("O".into()),
            surface: Some("Hard".into()),
            series: Some(series.into()),
            start_dtm: Some("19.02.2024".into()),
            finish_dtm: Some("24.02.2024".into()),
            sgl_draw_qty: Some(qty.into()),
            dbl_draw_qty: Some("16".into()),
            prize_money: Some("1400535".into()),
            prize_currency: Some("USD".into()),
            country_name: Some("Qatar".into()),
        }
    }

    #[test]
    fn test_resolve_normalizes_and_classifies() {
        let mut rules = HashMap::new();
        rules.insert("atp250".to_string(), 4);

        let t = resolve(&staged("2024-451", "atp250", "32"), None, &rules);
        assert_eq!(t.location.as_deref(), Some("Doha"));
        assert_eq!(t.start_dtm, NaiveDate::from_ymd_opt(2024, 2, 19));
        assert_eq!(t.sgl_draw_qty, Some(32));
        assert_eq!(t.prize_money, Some(1_400_535));
        assert_eq!(t.points_rule_id, Some(4));
        assert_eq!(t.draw_template_id.as_deref(), Some("R32-Q8"));
    }

    #[test]
    fn test_existing_values_win_over_lookups() {
        let mut rules = HashMap::new();
        rules.insert("atp250".to_string(), 4);

        let mut manual = resolve(&staged("2024-451", "atp250", "32"), None, &rules);
        manual.points_rule_id = Some(99);
        manual.country_name = Some("State of Qatar".into());

        let t = resolve(&staged("2024-451", "atp250", "32"), Some(&manual), &rules);
        assert_eq!(t.points_rule_id, Some(99));
        assert_eq!(t.country_name.as_deref(), Some("State of Qatar"));
    }

    #[test]
    fn test_country_name_normalized() {
        let t = resolve(
            &StgTournament {
                country_name: Some("Turkiye".into()),
                ..staged("2024-7290", "atp250", "32")
            },
            None,
            &HashMap::new(),
        );
        assert_eq!(t.country_name.as_deref(), Some("Turkey"));
    }

    #[test]
    fn test_malformed_numerics_degrade_to_absent() {
        let t = resolve(&staged("2024-451", "atp250", "n/a"), None, &HashMap::new());
        assert_eq!(t.sgl_draw_qty, None);
        assert_eq!(t.points_rule_id, None);
    }
}
