//! Maps a validated score pair to a `Recommendation` via the rule table.

use chrono::{DateTime, Utc};
use market_monitor_core::error::{Result, RiskError};
use market_monitor_core::types::Recommendation;

use crate::rules::RuleTable;

/// Produces the recommendation record for one pair and one evaluation cycle.
///
/// # Errors
///
/// - `RiskError::Validation` if either score is outside [0, 1] or not
///   finite.
/// - `RiskError::UnmatchedRule` if no rule matches; with a table that
///   passed the startup totality check this is unreachable.
pub fn recommend(
    pair: &str,
    timestamp: DateTime<Utc>,
    volatility_score: f64,
    event_impact_score: f64,
    table: &RuleTable,
) -> Result<Recommendation> {
    for (name, score) in [
        ("volatility", volatility_score),
        ("event impact", event_impact_score),
    ] {
        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return Err(RiskError::validation(format!(
                "{name} score {score} outside [0, 1]"
            )));
        }
    }

    let rule = table
        .lookup(volatility_score, event_impact_score)
        .ok_or(RiskError::UnmatchedRule {
            volatility: volatility_score,
            event_impact: event_impact_score,
        })?;

    Ok(Recommendation {
        pair: pair.to_string(),
        timestamp,
        volatility_score,
        event_impact_score,
        action: rule.action,
        risk_level: rule.risk_level,
    })
}
