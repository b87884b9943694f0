//! Sub-metric calculations and the composite volatility score.

use market_monitor_core::config::VolatilityConfig;
use market_monitor_core::error::{Result, RiskError};
use market_monitor_core::types::{PriceSeries, VolatilityMetrics};

use crate::normalize::build_normalizer;

/// Computes all sub-metrics and the composite score for one series.
///
/// # Errors
///
/// - `RiskError::InsufficientData` if the series is shorter than the
///   slowest configured window. No partial metrics are returned.
/// - `RiskError::ComputationOverflow` on a degenerate series (zero middle
///   band or zero last close).
pub fn analyze(series: &PriceSeries, config: &VolatilityConfig) -> Result<VolatilityMetrics> {
    let required = config.required_candles();
    if series.len() < required {
        return Err(RiskError::insufficient_data(required, series.len()));
    }

    let closes = series.closes()?;
    let highs = series.highs()?;
    let lows = series.lows()?;

    let historical_volatility =
        historical_volatility(&closes, config.hv_window, config.periods_per_year)?;
    let atr = average_true_range(&highs, &lows, &closes, config.atr_period)?;
    let bollinger_width = bollinger_width(&closes, config.bb_period, config.bb_std_dev)?;

    let composite = composite_score(historical_volatility, atr, bollinger_width, config);
    tracing::debug!(
        pair = series.pair(),
        hv = historical_volatility,
        atr,
        bbw = bollinger_width,
        composite,
        "volatility analyzed"
    );

    Ok(VolatilityMetrics {
        historical_volatility,
        atr,
        bollinger_width,
        composite_score: composite,
    })
}

/// Annualized standard deviation of log returns over the trailing window.
///
/// # Errors
///
/// Returns `InsufficientData` when fewer than `window + 1` closes are
/// available, `Validation` on non-positive closes.
pub fn historical_volatility(closes: &[f64], window: usize, periods_per_year: f64) -> Result<f64> {
    if closes.len() < window + 1 {
        return Err(RiskError::insufficient_data(window + 1, closes.len()));
    }
    let start = closes.len() - window;
    let mut returns = Vec::with_capacity(window);
    for i in start..closes.len() {
        if closes[i] <= 0.0 || closes[i - 1] <= 0.0 {
            return Err(RiskError::validation("non-positive close in log return"));
        }
        returns.push((closes[i] / closes[i - 1]).ln());
    }
    Ok(std_dev(&returns) * periods_per_year.sqrt())
}

/// Mean true range over the trailing period, as a fraction of the last
/// close. `TR_t = max(high - low, |high - prev_close|, |low - prev_close|)`.
///
/// # Errors
///
/// Returns `InsufficientData` when fewer than `period + 1` candles are
/// available (the oldest contributes only its close), `Validation` on
/// mismatched slice lengths, `ComputationOverflow` on a zero last close.
pub fn average_true_range(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Result<f64> {
    if highs.len() != closes.len() || lows.len() != closes.len() {
        return Err(RiskError::validation("OHLC slices differ in length"));
    }
    if closes.len() < period + 1 {
        return Err(RiskError::insufficient_data(period + 1, closes.len()));
    }
    let start = closes.len() - period;
    let mut sum = 0.0;
    for i in start..closes.len() {
        let prev_close = closes[i - 1];
        let tr = (highs[i] - lows[i])
            .max((highs[i] - prev_close).abs())
            .max((lows[i] - prev_close).abs());
        sum += tr;
    }
    let last_close = closes[closes.len() - 1];
    if last_close.abs() < f64::EPSILON {
        return Err(RiskError::overflow("last close is zero in ATR scaling"));
    }
    Ok(sum / period as f64 / last_close)
}

/// Bollinger band width relative to the middle band:
/// `(upper - lower) / middle` with bands at `middle ± k * stdev`.
///
/// # Errors
///
/// Returns `InsufficientData` when fewer than `period` closes are
/// available, `ComputationOverflow` when the middle band is zero.
pub fn bollinger_width(closes: &[f64], period: usize, k: f64) -> Result<f64> {
    if closes.len() < period {
        return Err(RiskError::insufficient_data(period, closes.len()));
    }
    let tail = &closes[closes.len() - period..];
    let middle = mean(tail);
    if middle.abs() < f64::EPSILON {
        return Err(RiskError::overflow("middle band is zero in width ratio"));
    }
    let spread = 2.0 * k * std_dev(tail);
    Ok(spread / middle)
}

/// Weighted combination of the normalized sub-metrics, clamped to [0, 1]
/// to absorb normalization overshoot.
#[must_use]
pub fn composite_score(hv: f64, atr: f64, bbw: f64, config: &VolatilityConfig) -> f64 {
    let hv_n = build_normalizer(&config.hv_normalization).normalize(hv);
    let atr_n = build_normalizer(&config.atr_normalization).normalize(atr);
    let bbw_n = build_normalizer(&config.bbw_normalization).normalize(bbw);
    let w = &config.weights;
    (w.hv * hv_n + w.atr * atr_n + w.bbw * bbw_n).clamp(0.0, 1.0)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// Population standard deviation; the window is the whole population being
// summarized, and the constant factor is absorbed by normalization anyway.
fn std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
