//! Player identity merge
//!
//! Retires a duplicate player code in favor of a surviving one. The merge
//! is computed first as an ordered-step plan over a snapshot, then applied
//! as one transaction; a failure at any step leaves every table untouched
//! and the batch marked failed. Match rows keep their surrogate ids, so a
//! merge is only ever a foreign-key rewrite.

use crate::db::models::{EnrichedMatch, Player, Severity};
use crate::digest::Fingerprint;
use crate::errors::{ReconError, Result};
use crate::ledger::run_batch;
use crate::store::{Store, WriteOp};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

pub const MODULE: &str = "merge players";

/// One named step of the merge plan, with the ops it contributes.
#[derive(Debug, Clone)]
pub struct MergeStep {
    pub name: &'static str,
    pub ops: Vec<WriteOp>,
}

/// The full ordered merge plan. Applied atomically, logged per step.
#[derive(Debug, Clone)]
pub struct MergePlan {
    pub survivor_code: String,
    pub retiring_code: String,
    pub steps: Vec<MergeStep>,
}

impl MergePlan {
    pub fn total_ops(&self) -> usize {
        self.steps.iter().map(|s| s.ops.len()).sum()
    }

    fn flatten(&self) -> Vec<WriteOp> {
        self.steps.iter().flat_map(|s| s.ops.clone()).collect()
    }
}

/// Outcome of an executed merge.
#[derive(Debug, Clone)]
pub struct MergeReport {
    pub batch_id: Uuid,
    pub survivor_code: String,
    pub retiring_code: String,
    /// (step name, planned row count) in execution order
    pub steps: Vec<(&'static str, u64)>,
    pub rows_affected: u64,
}

/// Merge the retiring player's identity into the survivor's.
///
/// Validates both codes, computes the plan and applies it in one
/// transaction under a ledger batch, logging each step's row count.
pub async fn merge_players<S>(
    store: &S,
    server: &str,
    survivor_code: &str,
    retiring_code: &str,
) -> Result<MergeReport>
where
    S: Store + ?Sized,
{
    run_batch(store, MODULE, server, |batch_id| async move {
        let plan = plan_merge(store, survivor_code, retiring_code).await?;

        let rows_affected = store.apply(batch_id, &plan.flatten()).await?;

        let mut steps = Vec::with_capacity(plan.steps.len());
        for step in &plan.steps {
            let qty = step.ops.len() as i64;
            store
                .append_log(batch_id, Severity::Info, step.name, Some(qty))
                .await?;
            steps.push((step.name, qty as u64));
        }

        let summary = serde_json::json!({
            "survivor": plan.survivor_code,
            "retiring": plan.retiring_code,
            "rows_affected": rows_affected,
        });
        store
            .append_log(batch_id, Severity::Info, &summary.to_string(), None)
            .await?;
        info!(
            survivor = %plan.survivor_code,
            retiring = %plan.retiring_code,
            rows_affected,
            "players merged"
        );

        Ok(MergeReport {
            batch_id,
            survivor_code: plan.survivor_code,
            retiring_code: plan.retiring_code,
            steps,
            rows_affected,
        })
    })
    .await
}

/// Compute the ordered merge plan from the current snapshot.
pub async fn plan_merge<S>(
    store: &S,
    survivor_code: &str,
    retiring_code: &str,
) -> Result<MergePlan>
where
    S: Store + ?Sized,
{
    let survivor_code = survivor_code.trim();
    let retiring_code = retiring_code.trim();

    if survivor_code.is_empty() {
        return Err(ReconError::MissingParameter { name: "to_code".into() });
    }
    if retiring_code.is_empty() {
        return Err(ReconError::MissingParameter { name: "from_code".into() });
    }
    if survivor_code == retiring_code {
        return Err(ReconError::Validation {
            message: format!("cannot merge player {survivor_code} into itself"),
        });
    }

    let survivor = store
        .find_player(survivor_code)
        .await?
        .ok_or_else(|| ReconError::PlayerNotFound { code: survivor_code.into() })?;
    let retiring = store
        .find_player(retiring_code)
        .await?
        .ok_or_else(|| ReconError::PlayerNotFound { code: retiring_code.into() })?;

    let mut steps = Vec::new();

    // 1. Fill the survivor's absent attributes from the retiring record.
    steps.push(MergeStep {
        name: "coalesce survivor attributes",
        ops: coalesce_ops(&survivor, &retiring),
    });

    // 2-3. Rewrite match participations, digests recomputed per row.
    let matches = store.matches_for_player(retiring_code).await?;
    let mut won_ops = Vec::new();
    let mut lost_ops = Vec::new();
    let mut touched_ids = Vec::new();
    for m in &matches {
        let mut next = m.clone();
        if next.winner_code == retiring_code {
            next.winner_code = survivor_code.to_string();
        }
        if next.loser_code == retiring_code {
            next.loser_code = survivor_code.to_string();
        }
        let op = WriteOp::UpdateMatchParticipants {
            id: next.id,
            winner_code: next.winner_code.clone(),
            loser_code: next.loser_code.clone(),
            delta_hash: next.delta_hash(),
        };
        if m.winner_code == retiring_code {
            won_ops.push(op);
        } else {
            lost_ops.push(op);
        }
        touched_ids.push(m.id);
    }
    steps.push(MergeStep { name: "rewrite won matches", ops: won_ops });
    steps.push(MergeStep { name: "rewrite lost matches", ops: lost_ops });

    // 4. Keep the enriched rows in lock-step with the rewritten matches.
    let enriched = store.enriched_for_matches(&touched_ids).await?;
    steps.push(MergeStep {
        name: "rewrite enriched matches",
        ops: enriched
            .iter()
            .map(|e| enriched_rewrite(e, survivor_code, retiring_code))
            .collect(),
    });

    // 5. Move points rows, summing totals where both identities scored.
    steps.push(MergeStep {
        name: "reassign player points",
        ops: points_ops(store, survivor_code, retiring_code).await?,
    });

    // 6. Repoint doubles-team links.
    let links = store.team_links_for(retiring_code).await?;
    steps.push(MergeStep {
        name: "rewrite team links",
        ops: links
            .iter()
            .map(|l| WriteOp::ReassignTeamLink {
                team_id: l.team_id.clone(),
                from_code: retiring_code.to_string(),
                to_code: survivor_code.to_string(),
            })
            .collect(),
    });

    // 7. Retire the duplicate dimension row.
    steps.push(MergeStep {
        name: "delete retiring player",
        ops: vec![WriteOp::DeletePlayer { code: retiring_code.to_string() }],
    });

    Ok(MergePlan {
        survivor_code: survivor_code.to_string(),
        retiring_code: retiring_code.to_string(),
        steps,
    })
}

/// First-non-null-wins attribute fill. The survivor's present attributes
/// are never overwritten; the write is skipped entirely when nothing
/// changes.
fn coalesce_ops(survivor: &Player, retiring: &Player) -> Vec<WriteOp> {
    let mut merged = survivor.clone();
    merged.slug = merged.slug.or_else(|| retiring.slug.clone());
    merged.first_name = merged.first_name.or_else(|| retiring.first_name.clone());
    merged.last_name = merged.last_name.or_else(|| retiring.last_name.clone());
    merged.birthdate = merged.birthdate.or(retiring.birthdate);
    merged.birthplace = merged.birthplace.or_else(|| retiring.birthplace.clone());
    merged.residence = merged.residence.or_else(|| retiring.residence.clone());
    merged.flag_code = merged.flag_code.or_else(|| retiring.flag_code.clone());
    merged.turned_pro = merged.turned_pro.or(retiring.turned_pro);
    merged.weight_kg = merged.weight_kg.or(retiring.weight_kg);
    merged.height_cm = merged.height_cm.or(retiring.height_cm);
    merged.handedness = merged.handedness.or_else(|| retiring.handedness.clone());
    merged.backhand = merged.backhand.or_else(|| retiring.backhand.clone());

    let hash = merged.delta_hash();
    if hash == survivor.delta_hash {
        return Vec::new();
    }
    merged.delta_hash = hash;
    vec![WriteOp::PutPlayer(merged)]
}

fn enriched_rewrite(row: &EnrichedMatch, survivor: &str, retiring: &str) -> WriteOp {
    let mut next = row.clone();
    if next.winner_code == retiring {
        next.winner_code = survivor.to_string();
    }
    if next.loser_code == retiring {
        next.loser_code = survivor.to_string();
    }
    WriteOp::UpdateEnrichedParticipants {
        match_id: next.match_id,
        winner_code: next.winner_code.clone(),
        loser_code: next.loser_code.clone(),
        delta_hash: next.delta_hash(),
    }
}

/// Move every points row of the retiring code to the survivor.
///
/// A collision (both identities scored in the same tournament) merges the
/// totals into the survivor's row instead of violating the one-row-per-key
/// invariant.
async fn points_ops<S>(store: &S, survivor: &str, retiring: &str) -> Result<Vec<WriteOp>>
where
    S: Store + ?Sized,
{
    let retiring_rows = store.player_points_for(retiring).await?;
    let survivor_rows = store.player_points_for(survivor).await?;
    let survivor_by_tournament: HashMap<&str, &crate::db::models::PlayerPoints> = survivor_rows
        .iter()
        .map(|p| (p.tournament_id.as_str(), p))
        .collect();

    let mut ops = Vec::new();
    for row in &retiring_rows {
        ops.push(WriteOp::DeletePlayerPoints {
            tournament_id: row.tournament_id.clone(),
            player_code: retiring.to_string(),
        });

        let mut moved = row.clone();
        moved.player_code = survivor.to_string();
        if let Some(held) = survivor_by_tournament.get(row.tournament_id.as_str()) {
            moved.points += held.points;
        }
        moved.delta_hash = moved.delta_hash();
        ops.push(WriteOp::PutPlayerPoints(moved));
    }
    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::PlayerPoints;
    use crate::store::MemStore;
    use chrono::NaiveDate;

    fn player(code: &str, height_cm: Option<i32>, backhand: Option<&str>) -> Player {
        let mut p = Player {
            code: code.into(),
            slug: None,
            first_name: None,
            last_name: Some(code.to_uppercase()),
            birthdate: NaiveDate::from_ymd_opt(1993, 6, 22),
            birthplace: None,
            residence: None,
            flag_code: Some("SUI".into()),
            turned_pro: None,
            weight_kg: None,
            height_cm,
            handedness: Some("R".into()),
            backhand: backhand.map(str::to_string),
            delta_hash: String::new(),
            batch_id: None,
        };
        p.delta_hash = p.delta_hash();
        p
    }

    #[tokio::test]
    async fn test_validation_rejects_bad_codes() {
        let store = MemStore::new();

        let err = plan_merge(&store, "", "abcd").await.unwrap_err();
        assert!(matches!(err, ReconError::MissingParameter { .. }));

        let err = plan_merge(&store, "abcd", "  ").await.unwrap_err();
        assert!(matches!(err, ReconError::MissingParameter { .. }));

        let err = plan_merge(&store, "abcd", "abcd").await.unwrap_err();
        assert!(err.is_validation());

        let err = plan_merge(&store, "abcd", "wxyz").await.unwrap_err();
        assert!(matches!(err, ReconError::PlayerNotFound { .. }));
    }

    #[tokio::test]
    async fn test_survivor_attributes_never_overwritten() {
        let survivor = player("aaaa", Some(185), None);
        let retiring = player("bbbb", Some(191), Some("1"));

        let ops = coalesce_ops(&survivor, &retiring);
        assert_eq!(ops.len(), 1);
        let WriteOp::PutPlayer(merged) = &ops[0] else {
            panic!("expected a player write");
        };
        assert_eq!(merged.height_cm, Some(185));
        assert_eq!(merged.backhand.as_deref(), Some("1"));
        assert_eq!(merged.delta_hash, merged.delta_hash());
    }

    #[tokio::test]
    async fn test_coalesce_skips_when_nothing_fills() {
        let survivor = player("aaaa", Some(185), Some("2"));
        let retiring = player("bbbb", Some(191), Some("1"));

        // Every survivor attribute the retiring record could fill is present
        let mut full = survivor.clone();
        full.slug = Some("roger-federer".into());
        full.first_name = Some("Roger".into());
        full.birthplace = Some("Basel".into());
        full.residence = Some("Bottmingen".into());
        full.turned_pro = Some(1998);
        full.weight_kg = Some(85);
        full.delta_hash = full.delta_hash();

        let ops = coalesce_ops(&full, &retiring);
        assert!(ops.is_empty());
    }

    #[tokio::test]
    async fn test_points_collision_sums_totals() {
        let store = MemStore::new();
        store
            .seed_players(vec![player("aaaa", Some(185), None), player("bbbb", None, None)])
            .await;

        let mut held = PlayerPoints {
            tournament_id: "2024-451".into(),
            player_code: "aaaa".into(),
            points: 90,
            delta_hash: String::new(),
            batch_id: None,
        };
        held.delta_hash = held.delta_hash();
        let mut moved = PlayerPoints {
            tournament_id: "2024-451".into(),
            player_code: "bbbb".into(),
            points: 45,
            delta_hash: String::new(),
            batch_id: None,
        };
        moved.delta_hash = moved.delta_hash();
        store.seed_player_points(vec![held, moved]).await;

        let plan = plan_merge(&store, "aaaa", "bbbb").await.unwrap();
        let step = plan
            .steps
            .iter()
            .find(|s| s.name == "reassign player points")
            .unwrap();

        let summed = step.ops.iter().find_map(|op| match op {
            WriteOp::PutPlayerPoints(row) => Some(row),
            _ => None,
        });
        let summed = summed.unwrap();
        assert_eq!(summed.player_code, "aaaa");
        assert_eq!(summed.points, 135);
        assert!(step
            .ops
            .iter()
            .any(|op| matches!(op, WriteOp::DeletePlayerPoints { player_code, .. } if player_code == "bbbb")));
    }

    #[tokio::test]
    async fn test_plan_ends_with_retirement() {
        let store = MemStore::new();
        store
            .seed_players(vec![player("aaaa", None, None), player("bbbb", None, None)])
            .await;

        let plan = plan_merge(&store, "aaaa", "bbbb").await.unwrap();
        let last = plan.steps.last().unwrap();
        assert_eq!(last.name, "delete retiring player");
        assert_eq!(
            last.ops,
            vec![WriteOp::DeletePlayer { code: "bbbb".into() }]
        );
    }
}
