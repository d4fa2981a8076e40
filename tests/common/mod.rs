//! Shared fixtures for the integration suites
//!
//! Everything runs against the in-memory store backend; fixtures mirror a
//! small ATP 250 week in Doha plus a Grand Slam qualifying block.

#![allow(dead_code)]

use chrono::NaiveDate;
use matchpoint::db::models::{
    MatchRow, Player, PlayerPoints, PointsRule, SeriesRule, StgPlayer, StgTournament, TeamLink,
    Tournament,
};
use matchpoint::digest::Fingerprint;
use matchpoint::domain::{MAIN_DRAW, QUAL_DRAW};
use matchpoint::store::MemStore;

pub fn mem_store() -> MemStore {
    MemStore::new()
}

pub fn staged_doha() -> StgTournament {
    StgTournament {
        id: "2024-451".into(),
        name: "Qatar ExxonMobil Open".into(),
        year: 2024,
        code: "451".into(),
        slug: Some("doha".into()),
        location: Some("Doha".into()),
        indoor_outdoor: Some("O".into()),
        surface: Some("Hard".into()),
        series: Some("atp250".into()),
        start_dtm: Some("19.02.2024".into()),
        finish_dtm: Some("24.02.2024".into()),
        sgl_draw_qty: Some("32".into()),
        dbl_draw_qty: Some("16".into()),
        prize_money: Some("1400535".into()),
        prize_currency: Some("USD".into()),
        country_name: Some("Qatar".into()),
    }
}

pub fn staged_player(code: &str, last_name: &str) -> StgPlayer {
    StgPlayer {
        player_code: code.into(),
        player_slug: Some(last_name.to_lowercase()),
        first_name: Some("Test".into()),
        last_name: Some(last_name.into()),
        flag_code: Some("ESP".into()),
        residence: None,
        birthplace: None,
        birthdate: Some("1996/04/19".into()),
        turned_pro: Some("2014".into()),
        weight_kg: Some("80".into()),
        height_cm: Some("188".into()),
        handedness: Some("R".into()),
        backhand: Some("2".into()),
    }
}

pub fn series_rules() -> Vec<SeriesRule> {
    vec![
        SeriesRule { series: "atp250".into(), points_rule_id: 4 },
        SeriesRule { series: "gs".into(), points_rule_id: 1 },
        SeriesRule { series: "atpFinal".into(), points_rule_id: 5 },
    ]
}

pub fn points_rules() -> Vec<PointsRule> {
    let rule = |rule_id: i32, stadie: &str, result: &str, points: i32| PointsRule {
        points_rule_id: rule_id,
        stadie_id: stadie.into(),
        result: result.into(),
        points,
    };
    vec![
        rule(4, "F", "W", 250),
        rule(4, "F", "L", 150),
        rule(4, "SF", "L", 90),
        rule(4, "QF", "L", 45),
        rule(4, "R16", "L", 20),
        rule(4, "R32", "L", 0),
        rule(4, "Q3", "W", 20),
        rule(4, "Q3", "L", 10),
        rule(1, "Q1", "L", 8),
        rule(1, "Q2", "W", 16),
        rule(1, "Q2", "L", 8),
        rule(1, "Q3", "W", 25),
        rule(1, "Q3", "L", 16),
    ]
}

pub fn tournament_doha() -> Tournament {
    let mut t = Tournament {
        id: "2024-451".into(),
        name: "Qatar ExxonMobil Open".into(),
        year: 2024,
        code: "451".into(),
        location: Some("Doha".into()),
        country_name: Some("Qatar".into()),
        indoor_outdoor: Some("O".into()),
        surface: Some("Hard".into()),
        series: Some("atp250".into()),
        start_dtm: NaiveDate::from_ymd_opt(2024, 2, 19),
        finish_dtm: NaiveDate::from_ymd_opt(2024, 2, 24),
        sgl_draw_qty: Some(32),
        dbl_draw_qty: Some(16),
        prize_money: Some(1_400_535),
        prize_currency: Some("USD".into()),
        points_rule_id: Some(4),
        draw_template_id: Some("R32-Q8".into()),
        delta_hash: String::new(),
        batch_id: None,
    };
    t.delta_hash = t.delta_hash();
    t
}

pub fn player(code: &str, last_name: &str) -> Player {
    let mut p = Player {
        code: code.into(),
        slug: Some(last_name.to_lowercase()),
        first_name: None,
        last_name: Some(last_name.into()),
        birthdate: None,
        birthplace: None,
        residence: None,
        flag_code: Some("ESP".into()),
        turned_pro: None,
        weight_kg: None,
        height_cm: None,
        handedness: None,
        backhand: None,
        delta_hash: String::new(),
        batch_id: None,
    };
    p.delta_hash = p.delta_hash();
    p
}

pub fn game(
    id: i64,
    tournament_id: &str,
    stadie: &str,
    draw: &str,
    winner: &str,
    loser: &str,
) -> MatchRow {
    let mut m = MatchRow {
        id,
        tournament_id: tournament_id.into(),
        stadie_id: stadie.into(),
        draw_type: draw.into(),
        match_order: None,
        winner_code: winner.into(),
        loser_code: loser.into(),
        score: Some("63 64".into()),
        match_ret: None,
        delta_hash: String::new(),
        batch_id: None,
    };
    m.delta_hash = m.delta_hash();
    m
}

pub fn main_draw_game(id: i64, stadie: &str, winner: &str, loser: &str) -> MatchRow {
    game(id, "2024-451", stadie, MAIN_DRAW, winner, loser)
}

pub fn qual_game(id: i64, stadie: &str, winner: &str, loser: &str) -> MatchRow {
    game(id, "2024-451", stadie, QUAL_DRAW, winner, loser)
}

pub fn points_row(tournament_id: &str, player_code: &str, points: i32) -> PlayerPoints {
    let mut p = PlayerPoints {
        tournament_id: tournament_id.into(),
        player_code: player_code.into(),
        points,
        delta_hash: String::new(),
        batch_id: None,
    };
    p.delta_hash = p.delta_hash();
    p
}

pub fn team_link(team_id: &str, player_code: &str) -> TeamLink {
    TeamLink {
        team_id: team_id.into(),
        player_code: player_code.into(),
        batch_id: None,
    }
}
