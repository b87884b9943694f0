//! The ordered decision table and its startup totality check.

use market_monitor_core::config::canonical_rules;
use market_monitor_core::error::{Result, RiskError};
use market_monitor_core::types::RecommendationRule;

/// Grid step for the totality check. 0.01 lands exactly on every threshold
/// used by the canonical table (0.2/0.4/0.6/0.8 and 0.5/0.6/0.7).
const TOTALITY_GRID_STEP: usize = 100;

/// Immutable, ordered recommendation rule table.
///
/// Rules are evaluated top-down; the first match wins. Predicate ranges
/// overlap deliberately (a score pair in the most severe bracket also
/// satisfies milder rules), so order is part of the table's meaning.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<RecommendationRule>,
}

impl RuleTable {
    /// Builds a table from configured rules, verifying totality.
    ///
    /// # Errors
    ///
    /// Returns `RiskError::Configuration` if the rule list is empty or
    /// leaves any score pair in [0, 1]² unmatched.
    pub fn new(rules: Vec<RecommendationRule>) -> Result<Self> {
        if rules.is_empty() {
            return Err(RiskError::configuration("recommendation rule table is empty"));
        }
        check_totality(&rules)?;
        Ok(Self { rules })
    }

    /// The canonical ten-row table from the built-in configuration.
    #[must_use]
    pub fn canonical() -> Self {
        // Known-total; the unit tests re-verify it through check_totality.
        Self {
            rules: canonical_rules(),
        }
    }

    #[must_use]
    pub fn rules(&self) -> &[RecommendationRule] {
        &self.rules
    }

    /// First rule matching the score pair, in configured order.
    #[must_use]
    pub fn lookup(&self, volatility_score: f64, event_impact_score: f64) -> Option<&RecommendationRule> {
        self.rules
            .iter()
            .find(|rule| rule.matches(volatility_score, event_impact_score))
    }
}

/// Verifies that every score pair on a fine grid over [0, 1]² matches some
/// rule under top-down evaluation.
///
/// Run once at load time so `UnmatchedRule` is unreachable at runtime.
///
/// # Errors
///
/// Returns `RiskError::Configuration` naming the first uncovered pair.
pub fn check_totality(rules: &[RecommendationRule]) -> Result<()> {
    for vi in 0..=TOTALITY_GRID_STEP {
        let v = vi as f64 / TOTALITY_GRID_STEP as f64;
        for ei in 0..=TOTALITY_GRID_STEP {
            let e = ei as f64 / TOTALITY_GRID_STEP as f64;
            if !rules.iter().any(|rule| rule.matches(v, e)) {
                return Err(RiskError::configuration(format!(
                    "rule table not total: no rule matches (volatility {v}, event impact {e})"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_monitor_core::types::{RiskLevel, TradeAction};

    #[test]
    fn test_canonical_table_is_total() {
        check_totality(RuleTable::canonical().rules()).unwrap();
    }

    #[test]
    fn test_canonical_table_matches_exactly_one_rule_per_bracket() {
        // Within each volatility bracket the two rules partition the event
        // axis, so top-down evaluation inside the bracket is unambiguous.
        let table = RuleTable::canonical();
        for vi in 0..=100 {
            let v = f64::from(vi) / 100.0;
            for ei in 0..=100 {
                let e = f64::from(ei) / 100.0;
                let first = table.lookup(v, e).unwrap();
                // The matched rule's volatility bracket contains v, and no
                // other rule in the same bracket matches.
                let same_bracket_matches = table
                    .rules()
                    .iter()
                    .filter(|r| {
                        r.volatility_threshold == first.volatility_threshold
                            && r.volatility_cmp == first.volatility_cmp
                            && r.matches(v, e)
                    })
                    .count();
                assert_eq!(same_bracket_matches, 1, "ambiguous at ({v}, {e})");
            }
        }
    }

    #[test]
    fn test_lookup_boundary_pairs() {
        let table = RuleTable::canonical();

        // v = 0.8 is not > 0.8, so the pair falls into the (0.6, 0.8] bracket.
        let rule = table.lookup(0.8, 0.7).unwrap();
        assert_eq!(rule.action, TradeAction::ReduceExposure);
        assert_eq!(rule.risk_level, RiskLevel::High);

        let rule = table.lookup(0.81, 0.71).unwrap();
        assert_eq!(rule.action, TradeAction::Hold);
        assert_eq!(rule.risk_level, RiskLevel::Extreme);

        let rule = table.lookup(0.0, 0.0).unwrap();
        assert_eq!(rule.action, TradeAction::RangeTrading);
        assert_eq!(rule.risk_level, RiskLevel::VeryLow);

        let rule = table.lookup(0.5, 0.55).unwrap();
        assert_eq!(rule.action, TradeAction::SelectiveTrading);
        assert_eq!(rule.risk_level, RiskLevel::Moderate);

        let rule = table.lookup(0.21, 0.61).unwrap();
        assert_eq!(rule.action, TradeAction::PrepareForVolatility);
        assert_eq!(rule.risk_level, RiskLevel::LowButIncreasing);
    }

    #[test]
    fn test_most_severe_rule_takes_precedence() {
        // (0.9, 0.8) also satisfies rules 3 and 5; rule 1 must win.
        let table = RuleTable::canonical();
        let rule = table.lookup(0.9, 0.8).unwrap();
        assert_eq!(rule.action, TradeAction::Hold);
    }

    #[test]
    fn test_gap_in_table_fails_totality() {
        let mut rules = canonical_rules();
        rules.remove(9); // drop the (<= 0.2, <= 0.5) catch
        let err = check_totality(&rules).unwrap_err();
        assert!(matches!(err, RiskError::Configuration(_)));
        assert!(err.to_string().contains("not total"));
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(RuleTable::new(vec![]).is_err());
    }

    #[test]
    fn test_table_from_config_rules() {
        let table = RuleTable::new(canonical_rules()).unwrap();
        assert_eq!(table.rules().len(), 10);
    }
}
