//! Application configuration.
//!
//! Everything pair-dependent lives here: indicator windows, normalization
//! baselines, composite weights, event severity mapping, decay curve, and
//! the ordered recommendation rule table. The configuration is read-only
//! after load and shared by reference across concurrent evaluations.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};
use crate::types::{RecommendationRule, RiskLevel, RuleComparator, TradeAction};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Trading pairs evaluated each cycle.
    pub pairs: Vec<String>,
    pub volatility: VolatilityConfig,
    pub events: EventImpactConfig,
    /// Ordered decision table, most-severe rules first.
    pub rules: Vec<RecommendationRule>,
}

/// Windows, normalization baselines, and weights for the volatility score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatilityConfig {
    /// Trailing window (in log returns) for historical volatility.
    pub hv_window: usize,
    /// Trailing window for the average true range.
    pub atr_period: usize,
    /// Trailing window for the Bollinger bands.
    pub bb_period: usize,
    /// Band distance in standard deviations.
    pub bb_std_dev: f64,
    /// Annualization base for HV, e.g. 365 for daily candles.
    pub periods_per_year: f64,
    pub weights: CompositeWeights,
    pub hv_normalization: NormalizationSpec,
    pub atr_normalization: NormalizationSpec,
    pub bbw_normalization: NormalizationSpec,
}

/// Weights of the normalized sub-metrics in the composite score.
/// Must sum to 1.0; checked once at configuration load.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompositeWeights {
    pub hv: f64,
    pub atr: f64,
    pub bbw: f64,
}

impl CompositeWeights {
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.hv + self.atr + self.bbw
    }
}

/// How a raw sub-metric is rescaled into [0, 1]. "High volatility" is
/// pair-dependent, so the reference range is configuration, not code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum NormalizationSpec {
    /// Linear rescale against a fixed reference range.
    MinMax { min: f64, max: f64 },
    /// Empirical percentile rank against a historical baseline sample.
    Percentile { baseline: Vec<f64> },
}

/// Event impact scoring parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventImpactConfig {
    /// Two-sided window around the reference time, in hours.
    pub window_hours: f64,
    pub severity: SeverityMap,
    pub decay: DecayCurve,
}

/// Per-impact-level severity, each in [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeverityMap {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

/// Time-proximity weighting applied to each event's severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "curve", rename_all = "snake_case")]
pub enum DecayCurve {
    /// 1.0 at the reference time, falling linearly to 0.0 at the window
    /// boundary.
    Linear,
    /// Halves every `half_life_hours` away from the reference time.
    Exponential { half_life_hours: f64 },
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pairs: vec![
                "BTCUSDT".to_string(),
                "ETHUSDT".to_string(),
                "SOLUSDT".to_string(),
                "XRPUSDT".to_string(),
                "BNBUSDT".to_string(),
            ],
            volatility: VolatilityConfig::default(),
            events: EventImpactConfig::default(),
            rules: canonical_rules(),
        }
    }
}

impl Default for VolatilityConfig {
    fn default() -> Self {
        Self {
            hv_window: 14,
            atr_period: 14,
            bb_period: 14,
            bb_std_dev: 2.0,
            periods_per_year: 365.0,
            weights: CompositeWeights {
                hv: 0.375,
                atr: 0.375,
                bbw: 0.25,
            },
            // Reference ranges for daily crypto candles: annualized HV up
            // to 100%, ATR up to 10% of price, band width up to 20%.
            hv_normalization: NormalizationSpec::MinMax { min: 0.0, max: 1.0 },
            atr_normalization: NormalizationSpec::MinMax { min: 0.0, max: 0.1 },
            bbw_normalization: NormalizationSpec::MinMax { min: 0.0, max: 0.2 },
        }
    }
}

impl Default for EventImpactConfig {
    fn default() -> Self {
        Self {
            window_hours: 168.0, // 7 days
            severity: SeverityMap {
                high: 1.0,
                medium: 0.6,
                low: 0.3,
            },
            decay: DecayCurve::Linear,
        }
    }
}

impl AppConfig {
    /// Validates everything the components assume at call time.
    ///
    /// Totality of the rule table is checked separately when the table is
    /// built, since matching semantics live with the engine.
    ///
    /// # Errors
    ///
    /// Returns `RiskError::Configuration` describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.pairs.is_empty() {
            return Err(RiskError::configuration("no trading pairs configured"));
        }
        self.volatility.validate()?;
        self.events.validate()?;
        if self.rules.is_empty() {
            return Err(RiskError::configuration("recommendation rule table is empty"));
        }
        for (i, rule) in self.rules.iter().enumerate() {
            if !(0.0..=1.0).contains(&rule.volatility_threshold)
                || !(0.0..=1.0).contains(&rule.event_threshold)
            {
                return Err(RiskError::configuration(format!(
                    "rule {} has a threshold outside [0, 1]",
                    i + 1
                )));
            }
        }
        Ok(())
    }
}

impl VolatilityConfig {
    fn validate(&self) -> Result<()> {
        if self.hv_window < 2 || self.atr_period < 1 || self.bb_period < 2 {
            return Err(RiskError::configuration(
                "volatility windows too short (hv/bb need >= 2, atr >= 1)",
            ));
        }
        if self.periods_per_year <= 0.0 {
            return Err(RiskError::configuration("periods_per_year must be positive"));
        }
        if self.bb_std_dev <= 0.0 {
            return Err(RiskError::configuration("bb_std_dev must be positive"));
        }
        let w = &self.weights;
        if w.hv < 0.0 || w.atr < 0.0 || w.bbw < 0.0 {
            return Err(RiskError::configuration("composite weights must be >= 0"));
        }
        if (w.sum() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(RiskError::configuration(format!(
                "composite weights must sum to 1.0, got {}",
                w.sum()
            )));
        }
        for (name, spec) in [
            ("hv", &self.hv_normalization),
            ("atr", &self.atr_normalization),
            ("bbw", &self.bbw_normalization),
        ] {
            spec.validate(name)?;
        }
        Ok(())
    }

    /// Minimum series length required by the slowest sub-metric. HV and ATR
    /// both look one candle further back for the previous close.
    #[must_use]
    pub fn required_candles(&self) -> usize {
        (self.hv_window + 1)
            .max(self.atr_period + 1)
            .max(self.bb_period)
    }
}

impl NormalizationSpec {
    fn validate(&self, name: &str) -> Result<()> {
        match self {
            Self::MinMax { min, max } => {
                if max <= min {
                    return Err(RiskError::configuration(format!(
                        "{name} normalization range is degenerate ({min}..{max})"
                    )));
                }
            }
            Self::Percentile { baseline } => {
                if baseline.is_empty() {
                    return Err(RiskError::configuration(format!(
                        "{name} percentile baseline is empty"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl EventImpactConfig {
    fn validate(&self) -> Result<()> {
        if self.window_hours <= 0.0 {
            return Err(RiskError::configuration("event window must be positive"));
        }
        let s = &self.severity;
        for (name, value) in [("high", s.high), ("medium", s.medium), ("low", s.low)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(RiskError::configuration(format!(
                    "{name} severity {value} outside [0, 1]"
                )));
            }
        }
        if let DecayCurve::Exponential { half_life_hours } = self.decay {
            if half_life_hours <= 0.0 {
                return Err(RiskError::configuration("half_life_hours must be positive"));
            }
        }
        Ok(())
    }
}

/// The canonical ten-row decision table, most-severe brackets first.
#[must_use]
pub fn canonical_rules() -> Vec<RecommendationRule> {
    use RiskLevel as R;
    use RuleComparator::{GreaterThan as Gt, LessThanOrEqual as Le};
    use TradeAction as A;

    let row = |vt, vc, et, ec, action, risk| RecommendationRule {
        volatility_threshold: vt,
        volatility_cmp: vc,
        event_threshold: et,
        event_cmp: ec,
        action,
        risk_level: risk,
    };

    vec![
        row(0.8, Gt, 0.7, Gt, A::Hold, R::Extreme),
        row(0.8, Gt, 0.7, Le, A::ScalpOnly, R::VeryHigh),
        row(0.6, Gt, 0.6, Gt, A::ReduceExposure, R::High),
        row(0.6, Gt, 0.6, Le, A::TradeWithCaution, R::Elevated),
        row(0.4, Gt, 0.5, Gt, A::SelectiveTrading, R::Moderate),
        row(0.4, Gt, 0.5, Le, A::TradeNormally, R::Normal),
        row(0.2, Gt, 0.6, Gt, A::PrepareForVolatility, R::LowButIncreasing),
        row(0.2, Gt, 0.6, Le, A::LongerTimeframes, R::Low),
        row(0.2, Le, 0.5, Gt, A::PrepareForBreakouts, R::VeryLowButWatch),
        row(0.2, Le, 0.5, Le, A::RangeTrading, R::VeryLow),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        AppConfig::default().validate().unwrap();
    }

    #[test]
    fn test_canonical_table_has_ten_rows() {
        assert_eq!(canonical_rules().len(), 10);
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut config = AppConfig::default();
        config.volatility.weights.hv = 0.5;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, RiskError::Configuration(_)));
        assert!(err.to_string().contains("sum to 1.0"));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut config = AppConfig::default();
        config.volatility.weights.hv = -0.25;
        config.volatility.weights.atr = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_degenerate_normalization_range_rejected() {
        let mut config = AppConfig::default();
        config.volatility.hv_normalization = NormalizationSpec::MinMax { min: 1.0, max: 1.0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_percentile_baseline_rejected() {
        let mut config = AppConfig::default();
        config.volatility.atr_normalization = NormalizationSpec::Percentile { baseline: vec![] };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_severity_outside_unit_interval_rejected() {
        let mut config = AppConfig::default();
        config.events.severity.high = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_rule_threshold_rejected() {
        let mut config = AppConfig::default();
        config.rules[0].event_threshold = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_required_candles_covers_slowest_window() {
        let config = VolatilityConfig::default();
        assert_eq!(config.required_candles(), 15);

        let mut config = VolatilityConfig::default();
        config.bb_period = 30;
        assert_eq!(config.required_candles(), 30);
    }
}
