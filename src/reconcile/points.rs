//! Ranking-points computation
//!
//! Scans reconciled matches against the points rulebook and produces one
//! total per (tournament, player). Classification is an ordered list of
//! named additive branches: every branch that accepts a match contributes
//! its rulebook points, and contributions for the same player and
//! tournament sum. Totals go through the digest-gated reconciler, and zero
//! totals are never written.

use crate::db::models::{MatchRow, PlayerPoints, PointsRule, Severity, Tournament};
use crate::domain::{
    is_team_series, stadie_ordinal, BYE_PLAYER_CODE, FIRST_QUALIFYING_STADIE, MAIN_DRAW,
    QUAL_DRAW, SERIES_GRAND_SLAM,
};
use crate::errors::Result;
use crate::ledger::run_batch;
use crate::reconcile::plan_upserts;
use crate::store::{Store, WriteOp};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

pub const MODULE: &str = "apply points rules";

/// Reconcile ranking points for every tournament with a rulebook reference.
///
/// Returns the number of rows actually written.
pub async fn apply_points_rules<S>(store: &S, server: &str) -> Result<u64>
where
    S: Store + ?Sized,
{
    run_batch(store, MODULE, server, |batch_id| async move {
        let tournaments = store.tournaments().await?;
        let matches = store.matches().await?;
        let rulebook = Rulebook::new(store.points_rules().await?);
        let existing = store.player_points().await?;

        let totals = compute_points(&tournaments, &matches, &rulebook);

        let candidates: Vec<PlayerPoints> = totals
            .into_iter()
            .map(|((tournament_id, player_code), points)| PlayerPoints {
                tournament_id,
                player_code,
                points,
                delta_hash: String::new(),
                batch_id: None,
            })
            .collect();

        let (ops, outcome) = plan_upserts(&existing, candidates, WriteOp::PutPlayerPoints);
        store.apply(batch_id, &ops).await?;

        info!(
            inserted = outcome.inserted,
            updated = outcome.updated,
            skipped = outcome.skipped,
            "player points reconciled"
        );
        store
            .append_log(
                batch_id,
                Severity::Info,
                "player points upserted",
                Some(outcome.written() as i64),
            )
            .await?;

        Ok(outcome.written())
    })
    .await
}

/// The points rulebook, indexed by (rulebook id, stadie, result).
pub struct Rulebook {
    entries: HashMap<(i32, String, String), i32>,
}

impl Rulebook {
    pub fn new(rules: Vec<PointsRule>) -> Self {
        Self {
            entries: rules
                .into_iter()
                .map(|r| ((r.points_rule_id, r.stadie_id, r.result), r.points))
                .collect(),
        }
    }

    fn points(&self, rule_id: i32, stadie_id: &str, result: &str) -> Option<i32> {
        self.entries
            .get(&(rule_id, stadie_id.to_string(), result.to_string()))
            .copied()
    }
}

/// What the branches look at for one match.
struct MatchFacts<'a> {
    stadie_id: &'a str,
    draw_type: &'a str,
    winner_code: &'a str,
    loser_code: &'a str,
    series: Option<&'a str>,
    /// Deepest qualifying stadie of this tournament, when the
    /// deepest-stage branch applies to it at all
    deepest_qual: Option<&'a str>,
}

impl MatchFacts<'_> {
    fn is_grand_slam(&self) -> bool {
        self.series == Some(SERIES_GRAND_SLAM)
    }
}

/// One point contribution: a player earned the rulebook entry
/// (stadie, result).
struct BranchHit {
    player_code: String,
    stadie_id: String,
    result: &'static str,
}

impl BranchHit {
    fn won(facts: &MatchFacts) -> Self {
        Self {
            player_code: facts.winner_code.to_string(),
            stadie_id: facts.stadie_id.to_string(),
            result: "W",
        }
    }

    fn lost(facts: &MatchFacts) -> Self {
        Self {
            player_code: facts.loser_code.to_string(),
            stadie_id: facts.stadie_id.to_string(),
            result: "L",
        }
    }
}

/// A named classification branch. Branches are additive: every branch
/// that accepts the match contributes.
struct PointsBranch {
    name: &'static str,
    hits: fn(&MatchFacts) -> Vec<BranchHit>,
}

static POINTS_BRANCHES: &[PointsBranch] = &[
    PointsBranch {
        name: "final winner",
        hits: |f| {
            if f.draw_type == MAIN_DRAW && f.stadie_id == "F" {
                vec![BranchHit::won(f)]
            } else {
                Vec::new()
            }
        },
    },
    PointsBranch {
        name: "main draw loser",
        hits: |f| {
            if f.draw_type == MAIN_DRAW {
                vec![BranchHit::lost(f)]
            } else {
                Vec::new()
            }
        },
    },
    PointsBranch {
        name: "grand slam qualifying",
        hits: |f| {
            if f.draw_type == QUAL_DRAW && f.is_grand_slam() {
                vec![BranchHit::won(f), BranchHit::lost(f)]
            } else {
                Vec::new()
            }
        },
    },
    PointsBranch {
        name: "deepest qualifying stage",
        hits: |f| {
            if f.draw_type == QUAL_DRAW
                && !f.is_grand_slam()
                && f.deepest_qual == Some(f.stadie_id)
            {
                vec![BranchHit::won(f), BranchHit::lost(f)]
            } else {
                Vec::new()
            }
        },
    },
    PointsBranch {
        name: "round robin winner",
        hits: |f| {
            if f.stadie_id == "RR" {
                vec![BranchHit::won(f)]
            } else {
                Vec::new()
            }
        },
    },
];

/// Compute point totals per (tournament, player).
///
/// Tournaments without a rulebook reference contribute nothing; BYE
/// entries never earn points; zero totals never arise because only
/// point-bearing branches produce entries.
pub fn compute_points(
    tournaments: &[Tournament],
    matches: &[MatchRow],
    rulebook: &Rulebook,
) -> BTreeMap<(String, String), i32> {
    let by_id: HashMap<&str, &Tournament> =
        tournaments.iter().map(|t| (t.id.as_str(), t)).collect();
    let deepest = deepest_qualifying_stadies(&by_id, matches);

    let mut totals: BTreeMap<(String, String), i32> = BTreeMap::new();

    for m in matches {
        let Some(tournament) = by_id.get(m.tournament_id.as_str()) else {
            continue;
        };
        let Some(rule_id) = tournament.points_rule_id else {
            continue;
        };

        let facts = MatchFacts {
            stadie_id: &m.stadie_id,
            draw_type: &m.draw_type,
            winner_code: &m.winner_code,
            loser_code: &m.loser_code,
            series: tournament.series.as_deref(),
            deepest_qual: deepest.get(m.tournament_id.as_str()).map(String::as_str),
        };

        for branch in POINTS_BRANCHES {
            for hit in (branch.hits)(&facts) {
                if hit.player_code == BYE_PLAYER_CODE {
                    continue;
                }
                let Some(points) = rulebook.points(rule_id, &hit.stadie_id, hit.result) else {
                    continue;
                };
                debug!(
                    tournament = %m.tournament_id,
                    player = %hit.player_code,
                    branch = branch.name,
                    points,
                    "points branch fired"
                );
                *totals
                    .entry((m.tournament_id.clone(), hit.player_code))
                    .or_insert(0) += points;
            }
        }
    }

    totals.retain(|_, points| *points > 0);
    totals
}

/// Deepest qualifying stadie per tournament, for the non-major branch.
///
/// Q1 is excluded from selection, as are team-style events entirely.
fn deepest_qualifying_stadies(
    tournaments: &HashMap<&str, &Tournament>,
    matches: &[MatchRow],
) -> HashMap<String, String> {
    let mut deepest: HashMap<String, (i32, String)> = HashMap::new();

    for m in matches {
        if m.draw_type != QUAL_DRAW || m.stadie_id == FIRST_QUALIFYING_STADIE {
            continue;
        }
        let team = tournaments
            .get(m.tournament_id.as_str())
            .and_then(|t| t.series.as_deref())
            .is_some_and(is_team_series);
        if team {
            continue;
        }
        let Some(ordinal) = stadie_ordinal(&m.stadie_id) else {
            continue;
        };
        match deepest.get(m.tournament_id.as_str()) {
            Some((best, _)) if *best >= ordinal => {}
            _ => {
                deepest.insert(m.tournament_id.clone(), (ordinal, m.stadie_id.clone()));
            }
        }
    }

    deepest
        .into_iter()
        .map(|(tid, (_, stadie))| (tid, stadie))
        .collect()
}
