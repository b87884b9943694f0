//! Shared data model: candles, economic events, rules, and the
//! recommendation record handed to reporting collaborators.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};

/// One OHLCV candle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// Ordered candle history for one trading pair.
///
/// Construction validates ordering and price sanity so the analyzers can
/// assume a well-formed series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    pair: String,
    candles: Vec<Candle>,
}

impl PriceSeries {
    /// Builds a series, validating strictly increasing timestamps, positive
    /// prices, and `low <= high` per candle.
    ///
    /// # Errors
    ///
    /// Returns `RiskError::Validation` when any invariant is violated.
    pub fn new(pair: impl Into<String>, candles: Vec<Candle>) -> Result<Self> {
        let pair = pair.into();
        for candle in &candles {
            if candle.open <= Decimal::ZERO
                || candle.high <= Decimal::ZERO
                || candle.low <= Decimal::ZERO
                || candle.close <= Decimal::ZERO
            {
                return Err(RiskError::validation(format!(
                    "{pair}: non-positive price at {}",
                    candle.timestamp
                )));
            }
            if candle.low > candle.high {
                return Err(RiskError::validation(format!(
                    "{pair}: low above high at {}",
                    candle.timestamp
                )));
            }
            if candle.volume < Decimal::ZERO {
                return Err(RiskError::validation(format!(
                    "{pair}: negative volume at {}",
                    candle.timestamp
                )));
            }
        }
        for pair_of_candles in candles.windows(2) {
            if pair_of_candles[1].timestamp <= pair_of_candles[0].timestamp {
                return Err(RiskError::validation(format!(
                    "{pair}: timestamps not strictly increasing at {}",
                    pair_of_candles[1].timestamp
                )));
            }
        }
        Ok(Self { pair, candles })
    }

    #[must_use]
    pub fn pair(&self) -> &str {
        &self.pair
    }

    #[must_use]
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Close prices as `f64` for statistical computation.
    ///
    /// # Errors
    ///
    /// Returns `RiskError::Validation` if a price does not fit in an `f64`.
    pub fn closes(&self) -> Result<Vec<f64>> {
        self.candles
            .iter()
            .map(|c| to_f64(c.close, &self.pair, "close"))
            .collect()
    }

    /// High prices as `f64`.
    ///
    /// # Errors
    ///
    /// Returns `RiskError::Validation` if a price does not fit in an `f64`.
    pub fn highs(&self) -> Result<Vec<f64>> {
        self.candles
            .iter()
            .map(|c| to_f64(c.high, &self.pair, "high"))
            .collect()
    }

    /// Low prices as `f64`.
    ///
    /// # Errors
    ///
    /// Returns `RiskError::Validation` if a price does not fit in an `f64`.
    pub fn lows(&self) -> Result<Vec<f64>> {
        self.candles
            .iter()
            .map(|c| to_f64(c.low, &self.pair, "low"))
            .collect()
    }
}

fn to_f64(value: Decimal, pair: &str, field: &str) -> Result<f64> {
    value
        .to_f64()
        .ok_or_else(|| RiskError::validation(format!("{pair}: {field} {value} not representable")))
}

/// Raw and composite volatility readings for one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityMetrics {
    /// Annualized standard deviation of log returns.
    pub historical_volatility: f64,
    /// Average true range as a fraction of the last close.
    pub atr: f64,
    /// Bollinger band width relative to the middle band.
    pub bollinger_width: f64,
    /// Weighted combination of the normalized sub-metrics, in [0, 1].
    pub composite_score: f64,
}

/// Qualitative severity of a scheduled economic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

impl FromStr for ImpactLevel {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(RiskError::validation(format!(
                "unknown impact level: {other}"
            ))),
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

/// One scheduled economic calendar entry. Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomicEvent {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub country: String,
    pub impact: ImpactLevel,
    pub actual: Option<Decimal>,
    pub forecast: Option<Decimal>,
    pub previous: Option<Decimal>,
}

/// Comparator used by a recommendation rule threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleComparator {
    GreaterThan,
    LessThanOrEqual,
}

impl RuleComparator {
    /// Applies the comparator to a score and its threshold.
    #[must_use]
    pub fn compare(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::GreaterThan => value > threshold,
            Self::LessThanOrEqual => value <= threshold,
        }
    }
}

impl fmt::Display for RuleComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GreaterThan => write!(f, ">"),
            Self::LessThanOrEqual => write!(f, "<="),
        }
    }
}

/// Trading action produced by the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeAction {
    Hold,
    ScalpOnly,
    ReduceExposure,
    TradeWithCaution,
    SelectiveTrading,
    TradeNormally,
    PrepareForVolatility,
    LongerTimeframes,
    PrepareForBreakouts,
    RangeTrading,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Hold => "HOLD",
            Self::ScalpOnly => "SCALP ONLY",
            Self::ReduceExposure => "REDUCE EXPOSURE",
            Self::TradeWithCaution => "TRADE WITH CAUTION",
            Self::SelectiveTrading => "SELECTIVE TRADING",
            Self::TradeNormally => "TRADE NORMALLY",
            Self::PrepareForVolatility => "PREPARE FOR VOLATILITY",
            Self::LongerTimeframes => "LONGER TIMEFRAMES",
            Self::PrepareForBreakouts => "PREPARE FOR BREAKOUTS",
            Self::RangeTrading => "RANGE TRADING",
        };
        write!(f, "{label}")
    }
}

/// Risk label paired with a trading action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Extreme,
    VeryHigh,
    High,
    Elevated,
    Moderate,
    Normal,
    LowButIncreasing,
    Low,
    VeryLowButWatch,
    VeryLow,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Extreme => "Extreme",
            Self::VeryHigh => "Very High",
            Self::High => "High",
            Self::Elevated => "Elevated",
            Self::Moderate => "Moderate",
            Self::Normal => "Normal",
            Self::LowButIncreasing => "Low but increasing",
            Self::Low => "Low",
            Self::VeryLowButWatch => "Very Low but watch",
            Self::VeryLow => "Very Low",
        };
        write!(f, "{label}")
    }
}

/// One row of the ordered decision table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRule {
    pub volatility_threshold: f64,
    pub volatility_cmp: RuleComparator,
    pub event_threshold: f64,
    pub event_cmp: RuleComparator,
    pub action: TradeAction,
    pub risk_level: RiskLevel,
}

impl RecommendationRule {
    /// Returns true if both predicates hold for the score pair.
    #[must_use]
    pub fn matches(&self, volatility_score: f64, event_impact_score: f64) -> bool {
        self.volatility_cmp
            .compare(volatility_score, self.volatility_threshold)
            && self
                .event_cmp
                .compare(event_impact_score, self.event_threshold)
    }
}

/// Final output record for one pair and one evaluation cycle.
///
/// Scores are carried at full precision; reporting collaborators round to
/// two decimals for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub pair: String,
    pub timestamp: DateTime<Utc>,
    pub volatility_score: f64,
    pub event_impact_score: f64,
    pub action: TradeAction,
    pub risk_level: RiskLevel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn candle(ts_secs: i64, close: Decimal) -> Candle {
        Candle {
            timestamp: Utc.timestamp_opt(ts_secs, 0).unwrap(),
            open: close,
            high: close + dec!(1),
            low: close - dec!(1),
            close,
            volume: dec!(100),
        }
    }

    #[test]
    fn test_series_accepts_ordered_candles() {
        let series = PriceSeries::new(
            "BTCUSDT",
            vec![candle(0, dec!(100)), candle(60, dec!(101))],
        )
        .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.pair(), "BTCUSDT");
    }

    #[test]
    fn test_series_rejects_unordered_timestamps() {
        let err = PriceSeries::new(
            "BTCUSDT",
            vec![candle(60, dec!(100)), candle(0, dec!(101))],
        )
        .unwrap_err();
        assert!(matches!(err, RiskError::Validation(_)));
    }

    #[test]
    fn test_series_rejects_duplicate_timestamps() {
        let err = PriceSeries::new(
            "BTCUSDT",
            vec![candle(60, dec!(100)), candle(60, dec!(101))],
        )
        .unwrap_err();
        assert!(matches!(err, RiskError::Validation(_)));
    }

    #[test]
    fn test_series_rejects_non_positive_price() {
        let mut bad = candle(0, dec!(5));
        bad.low = dec!(0);
        let err = PriceSeries::new("BTCUSDT", vec![bad]).unwrap_err();
        assert!(matches!(err, RiskError::Validation(_)));
    }

    #[test]
    fn test_series_rejects_low_above_high() {
        let mut bad = candle(0, dec!(100));
        bad.low = dec!(102);
        bad.high = dec!(101);
        let err = PriceSeries::new("BTCUSDT", vec![bad]).unwrap_err();
        assert!(matches!(err, RiskError::Validation(_)));
    }

    #[test]
    fn test_impact_level_parsing() {
        assert_eq!("High".parse::<ImpactLevel>().unwrap(), ImpactLevel::High);
        assert_eq!(
            " medium ".parse::<ImpactLevel>().unwrap(),
            ImpactLevel::Medium
        );
        assert_eq!("LOW".parse::<ImpactLevel>().unwrap(), ImpactLevel::Low);
        assert!("extreme".parse::<ImpactLevel>().is_err());
    }

    #[test]
    fn test_comparator_semantics() {
        assert!(RuleComparator::GreaterThan.compare(0.81, 0.8));
        assert!(!RuleComparator::GreaterThan.compare(0.8, 0.8));
        assert!(RuleComparator::LessThanOrEqual.compare(0.8, 0.8));
        assert!(!RuleComparator::LessThanOrEqual.compare(0.81, 0.8));
    }

    #[test]
    fn test_action_and_risk_labels() {
        assert_eq!(TradeAction::ScalpOnly.to_string(), "SCALP ONLY");
        assert_eq!(TradeAction::RangeTrading.to_string(), "RANGE TRADING");
        assert_eq!(
            RiskLevel::LowButIncreasing.to_string(),
            "Low but increasing"
        );
        assert_eq!(RiskLevel::VeryLowButWatch.to_string(), "Very Low but watch");
    }
}
