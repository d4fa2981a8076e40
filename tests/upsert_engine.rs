//! Integration tests for the change-detection upsert engines

mod common;

use common::*;
use matchpoint::db::models::BatchStatus;
use matchpoint::reconcile::{process_players, process_tournaments};
use matchpoint::store::Store;

#[tokio::test]
async fn staged_tournament_is_promoted_with_draw_template() {
    let store = mem_store();
    store.seed_staged_tournaments(vec![staged_doha()]).await;
    store.seed_series_rules(series_rules()).await;

    let written = process_tournaments(&store, "test").await.unwrap();
    assert_eq!(written, 1);

    let tournaments = store.tournaments().await.unwrap();
    assert_eq!(tournaments.len(), 1);
    let t = &tournaments[0];
    assert_eq!(t.id, "2024-451");
    assert_eq!(t.draw_template_id.as_deref(), Some("R32-Q8"));
    assert_eq!(t.points_rule_id, Some(4));
    assert_eq!(t.sgl_draw_qty, Some(32));
    assert!(!t.delta_hash.is_empty());
    assert!(t.batch_id.is_some());
}

#[tokio::test]
async fn second_run_on_identical_staging_writes_nothing() {
    let store = mem_store();
    store.seed_staged_tournaments(vec![staged_doha()]).await;
    store.seed_series_rules(series_rules()).await;

    let first = process_tournaments(&store, "test").await.unwrap();
    assert_eq!(first, 1);
    let stamped = store.tournaments().await.unwrap()[0].batch_id;

    let second = process_tournaments(&store, "test").await.unwrap();
    assert_eq!(second, 0);

    // The skipped row keeps its original provenance
    assert_eq!(store.tournaments().await.unwrap()[0].batch_id, stamped);
}

#[tokio::test]
async fn changed_attribute_is_written_once() {
    let store = mem_store();
    store.seed_staged_tournaments(vec![staged_doha()]).await;
    store.seed_series_rules(series_rules()).await;
    process_tournaments(&store, "test").await.unwrap();

    let mut changed = staged_doha();
    changed.prize_money = Some("1500000".into());

    store.clear_staging().await;
    store.seed_staged_tournaments(vec![changed.clone()]).await;

    let written = process_tournaments(&store, "test").await.unwrap();
    assert_eq!(written, 1);
    let t = &store.tournaments().await.unwrap()[0];
    assert_eq!(t.prize_money, Some(1_500_000));

    store.clear_staging().await;
    store.seed_staged_tournaments(vec![changed]).await;
    assert_eq!(process_tournaments(&store, "test").await.unwrap(), 0);
}

#[tokio::test]
async fn manual_rule_reference_survives_reprocessing() {
    let store = mem_store();
    store.seed_staged_tournaments(vec![staged_doha()]).await;
    store.seed_series_rules(series_rules()).await;
    process_tournaments(&store, "test").await.unwrap();

    // Manual correction applied outside the engine
    let mut corrected = store.tournaments().await.unwrap().remove(0);
    corrected.points_rule_id = Some(99);
    store.seed_tournaments(vec![corrected]).await;

    process_tournaments(&store, "test").await.unwrap();
    assert_eq!(
        store.tournaments().await.unwrap()[0].points_rule_id,
        Some(99)
    );
}

#[tokio::test]
async fn staged_players_are_promoted() {
    let store = mem_store();
    store
        .seed_staged_players(vec![
            staged_player("a0e2", "Alcaraz"),
            staged_player("s0ag", "Sinner"),
        ])
        .await;

    let written = process_players(&store, "test").await.unwrap();
    assert_eq!(written, 2);

    let p = store.find_player("a0e2").await.unwrap().unwrap();
    assert_eq!(p.last_name.as_deref(), Some("Alcaraz"));
    assert_eq!(p.turned_pro, Some(2014));
    assert!(!p.delta_hash.is_empty());

    assert_eq!(process_players(&store, "test").await.unwrap(), 0);
}

#[tokio::test]
async fn successful_run_leaves_a_succeeded_batch_with_counts() {
    let store = mem_store();
    store.seed_staged_tournaments(vec![staged_doha()]).await;
    store.seed_series_rules(series_rules()).await;
    process_tournaments(&store, "test").await.unwrap();

    let batch_id = store.tournaments().await.unwrap()[0].batch_id.unwrap();
    let batch = store.find_batch(batch_id).await.unwrap().unwrap();
    assert_eq!(batch.module, "process atp tournaments");
    assert_eq!(batch.server, "test");
    assert_eq!(batch.batch_status(), BatchStatus::Succeeded);
    assert!(batch.end_dtm.is_some());

    let logs = store.batch_logs(batch_id).await.unwrap();
    assert!(logs
        .iter()
        .any(|l| l.message == "tournaments upserted" && l.qty == Some(1)));
}
