//! Draw-template classification
//!
//! Assigns a tournament its bracket layout (e.g. `R32-Q8`: 32-player main
//! draw with an 8-player qualifying draw) from series and draw size.
//! Evaluated as an ordered rule table; when no rule fires the previously
//! stored template is kept, so manual assignments survive reprocessing.

use crate::domain::{is_team_series, DRAW_TEMPLATE_CARVE_OUT_CODES};
use crate::rules::{Rule, RuleTable};
use tracing::debug;

/// Facts the classification looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawFacts {
    pub series: Option<String>,
    pub code: String,
    pub sgl_draw_qty: Option<i32>,
}

impl DrawFacts {
    fn series_is(&self, name: &str) -> bool {
        self.series.as_deref() == Some(name)
    }

    fn draw_at_least(&self, n: i32) -> bool {
        self.sgl_draw_qty.is_some_and(|qty| qty >= n)
    }
}

static DRAW_TEMPLATE_RULES: RuleTable<DrawFacts, Option<&'static str>> = RuleTable::new(&[
    Rule {
        name: "season-final round robin",
        applies: |f| f.series_is("atpFinal") || f.series_is("nextGen"),
        outcome: |_| Some("RR8"),
    },
    Rule {
        name: "team event",
        applies: |f| {
            f.series.as_deref().is_some_and(is_team_series)
                || DRAW_TEMPLATE_CARVE_OUT_CODES.contains(&f.code.as_str())
        },
        outcome: |_| None,
    },
    Rule {
        name: "draw of 96 or more",
        applies: |f| f.draw_at_least(96),
        outcome: |_| Some("R128-Q16"),
    },
    Rule {
        name: "draw of 48 or more",
        applies: |f| f.draw_at_least(48),
        outcome: |_| Some("R64-Q16"),
    },
    Rule {
        name: "draw of 28 or more",
        applies: |f| f.draw_at_least(28),
        outcome: |_| Some("R32-Q8"),
    },
    Rule {
        name: "draw of 12 or more",
        applies: |f| f.draw_at_least(12),
        outcome: |_| Some("R16-Q4"),
    },
]);

/// Classify a tournament's draw template.
///
/// `stored` is the template currently on the dimension row; it is kept
/// when no rule fires.
pub fn classify_draw_template(facts: &DrawFacts, stored: Option<&str>) -> Option<String> {
    match DRAW_TEMPLATE_RULES.first_match(facts) {
        Some((rule, outcome)) => {
            debug!(code = %facts.code, rule, template = ?outcome, "draw template classified");
            outcome.map(str::to_string)
        }
        None => stored.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(series: Option<&str>, code: &str, qty: Option<i32>) -> DrawFacts {
        DrawFacts {
            series: series.map(str::to_string),
            code: code.to_string(),
            sgl_draw_qty: qty,
        }
    }

    #[test]
    fn test_season_finals_are_round_robin() {
        let f = facts(Some("atpFinal"), "605", Some(8));
        assert_eq!(classify_draw_template(&f, None), Some("RR8".into()));

        let f = facts(Some("nextGen"), "7696", Some(8));
        assert_eq!(classify_draw_template(&f, None), Some("RR8".into()));
    }

    #[test]
    fn test_team_events_get_no_template() {
        let f = facts(Some("laverCup"), "9210", Some(12));
        assert_eq!(classify_draw_template(&f, None), None);

        // Carve-out code wins even with a large draw
        let f = facts(Some("atp250"), "96", Some(32));
        assert_eq!(classify_draw_template(&f, None), None);
    }

    #[test]
    fn test_draw_size_thresholds() {
        let f = facts(Some("gs"), "520", Some(128));
        assert_eq!(classify_draw_template(&f, None), Some("R128-Q16".into()));

        let f = facts(Some("atp500"), "311", Some(48));
        assert_eq!(classify_draw_template(&f, None), Some("R64-Q16".into()));

        let f = facts(Some("atp250"), "337", Some(32));
        assert_eq!(classify_draw_template(&f, None), Some("R32-Q8".into()));

        let f = facts(Some("ch100"), "2516", Some(16));
        assert_eq!(classify_draw_template(&f, None), Some("R16-Q4".into()));
    }

    #[test]
    fn test_stored_template_kept_when_no_rule_fires() {
        let f = facts(Some("atp250"), "337", Some(8));
        assert_eq!(
            classify_draw_template(&f, Some("R16-Q4")),
            Some("R16-Q4".into())
        );
        assert_eq!(classify_draw_template(&f, None), None);
    }
}
