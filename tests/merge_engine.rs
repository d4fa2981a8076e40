//! Integration tests for the identity merge engine

mod common;

use common::*;
use matchpoint::db::models::{BatchStatus, EnrichedMatch};
use matchpoint::digest::Fingerprint;
use matchpoint::errors::ReconError;
use matchpoint::reconcile::merge_players;
use matchpoint::store::Store;

fn enriched(match_id: i64, winner: &str, loser: &str) -> EnrichedMatch {
    let mut e = EnrichedMatch {
        match_id,
        tournament_id: "2024-451".into(),
        winner_code: winner.into(),
        loser_code: loser.into(),
        winner_sets_won: Some(2),
        loser_sets_won: Some(0),
        winner_games_won: Some(12),
        loser_games_won: Some(7),
        winner_tiebreaks_won: Some(0),
        loser_tiebreaks_won: Some(0),
        delta_hash: String::new(),
        batch_id: None,
    };
    e.delta_hash = e.delta_hash();
    e
}

/// A duplicate pair: "bbbb" is the stray identity to retire into "aaaa".
async fn duplicate_pair() -> matchpoint::store::MemStore {
    let store = mem_store();
    store.seed_tournaments(vec![tournament_doha()]).await;

    let mut survivor = player("aaaa", "Nadal");
    survivor.height_cm = Some(185);
    let mut retiring = player("bbbb", "Nadal R.");
    retiring.height_cm = Some(191);
    retiring.birthplace = Some("Manacor, Spain".into());
    retiring.delta_hash = retiring.delta_hash();
    survivor.delta_hash = survivor.delta_hash();
    store
        .seed_players(vec![survivor, retiring, player("cccc", "Djokovic")])
        .await;

    // bbbb won M1 and lost M2
    store
        .seed_matches(vec![
            main_draw_game(1, "QF", "bbbb", "cccc"),
            main_draw_game(2, "SF", "cccc", "bbbb"),
        ])
        .await;
    store
        .seed_enriched(vec![enriched(1, "bbbb", "cccc"), enriched(2, "cccc", "bbbb")])
        .await;

    store
        .seed_player_points(vec![points_row("2024-451", "bbbb", 45)])
        .await;
    store
        .seed_team_links(vec![team_link("team-nadal-lopez", "bbbb")])
        .await;

    store
}

#[tokio::test]
async fn merge_rewrites_every_reference_and_retires_the_duplicate() {
    let store = duplicate_pair().await;

    let report = merge_players(&store, "test", "aaaa", "bbbb").await.unwrap();
    assert!(report.rows_affected > 0);

    // No referencing table still carries the retiring code
    assert!(store.matches_for_player("bbbb").await.unwrap().is_empty());
    assert!(store.player_points_for("bbbb").await.unwrap().is_empty());
    assert!(store.team_links_for("bbbb").await.unwrap().is_empty());
    assert!(store.find_player("bbbb").await.unwrap().is_none());

    // Participant columns point at the survivor, digests kept consistent
    let m1 = store
        .matches()
        .await
        .unwrap()
        .into_iter()
        .find(|m| m.id == 1)
        .unwrap();
    assert_eq!(m1.winner_code, "aaaa");
    assert_eq!(m1.delta_hash, m1.delta_hash());

    let m2 = store
        .matches()
        .await
        .unwrap()
        .into_iter()
        .find(|m| m.id == 2)
        .unwrap();
    assert_eq!(m2.loser_code, "aaaa");

    let enriched_rows = store.enriched_for_matches(&[1, 2]).await.unwrap();
    assert!(enriched_rows
        .iter()
        .all(|e| e.winner_code != "bbbb" && e.loser_code != "bbbb"));

    // Points moved to the survivor
    let points = store.player_points_for("aaaa").await.unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].points, 45);

    // Team link repointed
    assert_eq!(store.team_links_for("aaaa").await.unwrap().len(), 1);
}

#[tokio::test]
async fn survivor_attributes_are_filled_but_never_overwritten() {
    let store = duplicate_pair().await;

    merge_players(&store, "test", "aaaa", "bbbb").await.unwrap();

    let survivor = store.find_player("aaaa").await.unwrap().unwrap();
    // Present attribute untouched, absent attribute filled from retiring
    assert_eq!(survivor.height_cm, Some(185));
    assert_eq!(survivor.birthplace.as_deref(), Some("Manacor, Spain"));
    assert_eq!(survivor.delta_hash, survivor.delta_hash());
}

#[tokio::test]
async fn points_collision_sums_into_the_survivor_row() {
    let store = duplicate_pair().await;
    store
        .seed_player_points(vec![points_row("2024-451", "aaaa", 90)])
        .await;

    merge_players(&store, "test", "aaaa", "bbbb").await.unwrap();

    let points = store.player_points_for("aaaa").await.unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].points, 135);
    assert_eq!(points[0].delta_hash, points[0].delta_hash());
}

#[tokio::test]
async fn merge_logs_each_step_with_row_counts() {
    let store = duplicate_pair().await;

    let report = merge_players(&store, "test", "aaaa", "bbbb").await.unwrap();

    let names: Vec<&str> = report.steps.iter().map(|(name, _)| *name).collect();
    assert_eq!(
        names,
        vec![
            "coalesce survivor attributes",
            "rewrite won matches",
            "rewrite lost matches",
            "rewrite enriched matches",
            "reassign player points",
            "rewrite team links",
            "delete retiring player",
        ]
    );

    let logs = store.batch_logs(report.batch_id).await.unwrap();
    assert!(logs
        .iter()
        .any(|l| l.message == "rewrite won matches" && l.qty == Some(1)));
    assert!(logs
        .iter()
        .any(|l| l.message == "delete retiring player" && l.qty == Some(1)));

    let batch = store.find_batch(report.batch_id).await.unwrap().unwrap();
    assert_eq!(batch.module, "merge players");
    assert_eq!(batch.batch_status(), BatchStatus::Succeeded);
}

#[tokio::test]
async fn failed_merge_rolls_back_everything_and_marks_the_batch_failed() {
    let store = duplicate_pair().await;
    // The survivor already belongs to the same team: the link reassignment
    // collides and the whole transaction must roll back.
    store
        .seed_team_links(vec![team_link("team-nadal-lopez", "aaaa")])
        .await;

    let err = merge_players(&store, "test", "aaaa", "bbbb").await.unwrap_err();
    assert!(matches!(err, ReconError::Integrity { .. }));

    // Data untouched: retiring identity fully intact
    assert!(store.find_player("bbbb").await.unwrap().is_some());
    assert_eq!(store.matches_for_player("bbbb").await.unwrap().len(), 2);
    assert_eq!(store.player_points_for("bbbb").await.unwrap().len(), 1);
    assert_eq!(store.team_links_for("bbbb").await.unwrap().len(), 1);

    // The survivor gained nothing from the aborted run
    assert!(store.player_points_for("aaaa").await.unwrap().is_empty());
}

#[tokio::test]
async fn merge_of_missing_player_fails_validation_before_writing() {
    let store = duplicate_pair().await;

    let err = merge_players(&store, "test", "aaaa", "zzzz").await.unwrap_err();
    assert!(matches!(err, ReconError::PlayerNotFound { .. }));

    // Nothing changed
    assert!(store.find_player("bbbb").await.unwrap().is_some());
    assert_eq!(store.matches_for_player("bbbb").await.unwrap().len(), 2);
}
