//! Domain constants shared across the reconciliation engines
//!
//! Mirrors the vocabulary of the warehouse: draw types, stadie codes and
//! their depth ordering, series categories and normalization maps for
//! country spellings coming off the scraper.

/// Label for main draw matches
pub const MAIN_DRAW: &str = "main_draw";

/// Label for qualifying draw matches
pub const QUAL_DRAW: &str = "qual_draw";

/// Canonical code for BYE entries in draws. BYEs never earn points.
pub const BYE_PLAYER_CODE: &str = "0";

/// Series category of the majors; qualifying points apply at every stage
pub const SERIES_GRAND_SLAM: &str = "gs";

/// Team-style series: no individual qualifying points, no draw template
pub const TEAM_SERIES: &[&str] = &["atpCup", "laverCup", "dc"];

/// Tournament codes carved out of draw-template classification
/// (doubles-only event, Laver Cup, Olympics)
pub const DRAW_TEMPLATE_CARVE_OUT_CODES: &[&str] = &["602", "9210", "96"];

/// Depth ordinal of a stadie code. Higher means deeper in the tournament.
///
/// Qualifying rounds sort below every main-draw round; the ordering among
/// qualifying rounds drives deepest-qualifying-stage selection.
pub fn stadie_ordinal(stadie_id: &str) -> Option<i32> {
    match stadie_id {
        "Q1" => Some(1),
        "Q2" => Some(2),
        "Q3" => Some(3),
        "R128" => Some(4),
        "R64" => Some(5),
        "R32" => Some(6),
        "R16" => Some(7),
        "RR" => Some(7),
        "QF" => Some(8),
        "BR" => Some(9),
        "SF" => Some(9),
        "F" => Some(10),
        _ => None,
    }
}

/// First qualifying round, excluded from deepest-stage selection
pub const FIRST_QUALIFYING_STADIE: &str = "Q1";

/// Whether a series is a team-style event
pub fn is_team_series(series: &str) -> bool {
    TEAM_SERIES.contains(&series)
}

/// Normalize a scraped country name to the warehouse spelling.
pub fn normalize_country_name(name: &str) -> &str {
    match name {
        "Slovak Republic" => "Slovakia",
        "Bosnia-Herzegovina" => "Bosnia and Herzegovina",
        "Turkiye" => "Turkey",
        "Czechia" => "Czech Republic",
        "Republic of Congo" => "Democratic Republic of the Congo",
        other => other,
    }
}

/// Normalize non-standard 3-letter country codes to ISO-3166 alpha-3.
pub fn normalize_country_code(code: &str) -> &str {
    match code {
        "LIB" => "LBN",
        "SIN" => "SGP",
        "bra" => "BRA",
        "ROM" => "ROU",
        other => other,
    }
}
