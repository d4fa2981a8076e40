//! Prioritized rule tables
//!
//! Declarative first-match classification used where the warehouse derives
//! a category from row facts. A table is an ordered slice of rules; the
//! first predicate that accepts the facts decides the outcome.

pub mod draw_template;

pub use draw_template::{classify_draw_template, DrawFacts};

/// One rule: a named predicate and the outcome it assigns.
pub struct Rule<F, O> {
    /// Rule name, surfaced in logs when the rule fires
    pub name: &'static str,
    pub applies: fn(&F) -> bool,
    pub outcome: fn(&F) -> O,
}

/// Ordered rule table with first-match semantics.
pub struct RuleTable<F: 'static, O: 'static> {
    rules: &'static [Rule<F, O>],
}

impl<F, O> RuleTable<F, O> {
    pub const fn new(rules: &'static [Rule<F, O>]) -> Self {
        Self { rules }
    }

    /// Evaluate the table top to bottom; `None` when no rule accepts.
    pub fn first_match(&self, facts: &F) -> Option<(&'static str, O)> {
        self.rules
            .iter()
            .find(|rule| (rule.applies)(facts))
            .map(|rule| (rule.name, (rule.outcome)(facts)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static PARITY: RuleTable<i32, &'static str> = RuleTable::new(&[
        Rule {
            name: "zero",
            applies: |n| *n == 0,
            outcome: |_| "zero",
        },
        Rule {
            name: "even",
            applies: |n| n % 2 == 0,
            outcome: |_| "even",
        },
    ]);

    #[test]
    fn test_first_match_wins() {
        assert_eq!(PARITY.first_match(&0), Some(("zero", "zero")));
        assert_eq!(PARITY.first_match(&4), Some(("even", "even")));
    }

    #[test]
    fn test_no_match_is_none() {
        assert_eq!(PARITY.first_match(&3), None);
    }
}
