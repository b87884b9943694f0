//! Price-derived volatility scoring.
//!
//! Three sub-metrics (historical volatility, average true range, Bollinger
//! band width) are computed over a candle series, rescaled into [0, 1]
//! against configured reference ranges, and combined into one weighted
//! composite score. Everything here is a pure function of its inputs.

pub mod analyzer;
pub mod normalize;

pub use analyzer::{
    analyze, average_true_range, bollinger_width, composite_score, historical_volatility,
};
pub use normalize::{build_normalizer, MinMaxNormalizer, Normalizer, PercentileNormalizer};
