//! Aggregates scheduled economic events into one impact score in [0, 1].
//!
//! Each event inside the two-sided window contributes its configured
//! severity, scaled down by a time-decay factor so imminent events dominate
//! distant ones. Decayed severities are summed and capped at 1.0: several
//! simultaneous medium-impact events can compound into a high score, which
//! a plain maximum would hide, while the cap keeps the [0, 1] contract.

use chrono::{DateTime, Utc};
use market_monitor_core::config::{DecayCurve, EventImpactConfig, SeverityMap};
use market_monitor_core::types::{EconomicEvent, ImpactLevel};

/// Configured severity for an impact level.
#[must_use]
pub fn severity(level: ImpactLevel, map: &SeverityMap) -> f64 {
    match level {
        ImpactLevel::High => map.high,
        ImpactLevel::Medium => map.medium,
        ImpactLevel::Low => map.low,
    }
}

/// Time-proximity weight for an event: 1.0 at the reference time, 0.0 at or
/// beyond the window boundary. Past and future events decay symmetrically.
#[must_use]
pub fn decay_factor(
    event_time: DateTime<Utc>,
    reference_time: DateTime<Utc>,
    window_hours: f64,
    curve: DecayCurve,
) -> f64 {
    let distance_hours =
        (event_time - reference_time).num_seconds().abs() as f64 / 3600.0;
    if distance_hours > window_hours {
        return 0.0;
    }
    match curve {
        DecayCurve::Linear => 1.0 - distance_hours / window_hours,
        DecayCurve::Exponential { half_life_hours } => {
            0.5_f64.powf(distance_hours / half_life_hours)
        }
    }
}

/// Composite event impact score for one evaluation cycle.
///
/// Events outside `[reference - window, reference + window]` are excluded.
/// An empty event set scores exactly 0.0.
#[must_use]
pub fn score(
    events: &[EconomicEvent],
    reference_time: DateTime<Utc>,
    config: &EventImpactConfig,
) -> f64 {
    let total: f64 = events
        .iter()
        .map(|event| {
            severity(event.impact, &config.severity)
                * decay_factor(
                    event.timestamp,
                    reference_time,
                    config.window_hours,
                    config.decay,
                )
        })
        .sum();
    let capped = total.min(1.0);
    tracing::debug!(events = events.len(), total, capped, "event impact scored");
    capped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(offset_hours: i64, impact: ImpactLevel) -> EconomicEvent {
        EconomicEvent {
            timestamp: reference() + Duration::hours(offset_hours),
            name: "FOMC Meeting Minutes".to_string(),
            country: "United States".to_string(),
            impact,
            actual: None,
            forecast: None,
            previous: None,
        }
    }

    fn reference() -> DateTime<Utc> {
        "2026-03-01T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_empty_set_scores_exactly_zero() {
        let config = EventImpactConfig::default();
        assert_eq!(score(&[], reference(), &config), 0.0);
    }

    #[test]
    fn test_event_at_reference_scores_full_severity() {
        let config = EventImpactConfig::default();
        let events = vec![event(0, ImpactLevel::High)];
        assert!((score(&events, reference(), &config) - 1.0).abs() < 1e-12);

        let events = vec![event(0, ImpactLevel::Medium)];
        assert!((score(&events, reference(), &config) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_events_outside_window_excluded() {
        let config = EventImpactConfig::default();
        let events = vec![
            event(169, ImpactLevel::High),
            event(-169, ImpactLevel::High),
        ];
        assert_eq!(score(&events, reference(), &config), 0.0);
    }

    #[test]
    fn test_linear_decay_halves_at_midpoint() {
        let config = EventImpactConfig::default();
        // 84h = half of the 168h window; High severity 1.0 decays to 0.5.
        let events = vec![event(84, ImpactLevel::High)];
        assert!((score(&events, reference(), &config) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_decay_is_symmetric_for_past_events() {
        let config = EventImpactConfig::default();
        let future = score(&[event(48, ImpactLevel::Medium)], reference(), &config);
        let past = score(&[event(-48, ImpactLevel::Medium)], reference(), &config);
        assert!((future - past).abs() < 1e-12);
    }

    #[test]
    fn test_exponential_decay_half_life() {
        let factor = decay_factor(
            reference() + Duration::hours(24),
            reference(),
            168.0,
            DecayCurve::Exponential {
                half_life_hours: 24.0,
            },
        );
        assert!((factor - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_simultaneous_medium_events_compound() {
        let config = EventImpactConfig::default();
        let events = vec![event(0, ImpactLevel::Medium), event(0, ImpactLevel::Medium)];
        // 0.6 + 0.6 capped at 1.0
        assert_eq!(score(&events, reference(), &config), 1.0);
    }

    #[test]
    fn test_sum_capped_at_one() {
        let config = EventImpactConfig::default();
        let events: Vec<EconomicEvent> =
            (0..10).map(|_| event(0, ImpactLevel::High)).collect();
        assert_eq!(score(&events, reference(), &config), 1.0);
    }

    #[test]
    fn test_score_stays_in_unit_interval_on_mixed_sets() {
        let config = EventImpactConfig::default();
        let events = vec![
            event(-160, ImpactLevel::Low),
            event(-20, ImpactLevel::Medium),
            event(3, ImpactLevel::High),
            event(90, ImpactLevel::Low),
            event(500, ImpactLevel::High),
        ];
        let s = score(&events, reference(), &config);
        assert!((0.0..=1.0).contains(&s));
    }
}
