//! Pluggable normalization of raw sub-metrics into [0, 1].
//!
//! What counts as "high" volatility differs per pair and per candle
//! interval, so the reference baseline comes from configuration rather than
//! hardcoded constants.

use market_monitor_core::config::NormalizationSpec;

/// Rescales a raw sub-metric into [0, 1].
pub trait Normalizer: Send + Sync {
    fn normalize(&self, raw: f64) -> f64;
}

/// Linear rescale against a fixed reference range, clamped to [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct MinMaxNormalizer {
    min: f64,
    max: f64,
}

impl MinMaxNormalizer {
    /// The range must be non-degenerate; configuration load enforces this.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl Normalizer for MinMaxNormalizer {
    fn normalize(&self, raw: f64) -> f64 {
        ((raw - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

/// Empirical percentile rank against a historical baseline sample, with
/// linear interpolation between order statistics.
#[derive(Debug, Clone)]
pub struct PercentileNormalizer {
    sorted: Vec<f64>,
}

impl PercentileNormalizer {
    /// The baseline must be non-empty; configuration load enforces this.
    #[must_use]
    pub fn new(baseline: &[f64]) -> Self {
        let mut sorted = baseline.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Self { sorted }
    }
}

impl Normalizer for PercentileNormalizer {
    fn normalize(&self, raw: f64) -> f64 {
        let n = self.sorted.len();
        if n == 1 {
            return if raw >= self.sorted[0] { 1.0 } else { 0.0 };
        }
        if raw <= self.sorted[0] {
            return 0.0;
        }
        if raw >= self.sorted[n - 1] {
            return 1.0;
        }
        // raw falls strictly between two order statistics
        let upper = self.sorted.partition_point(|&x| x <= raw);
        let lo = self.sorted[upper - 1];
        let hi = self.sorted[upper];
        let fraction = if hi > lo { (raw - lo) / (hi - lo) } else { 0.0 };
        (((upper - 1) as f64 + fraction) / (n - 1) as f64).clamp(0.0, 1.0)
    }
}

/// Builds the normalizer selected by configuration.
#[must_use]
pub fn build_normalizer(spec: &NormalizationSpec) -> Box<dyn Normalizer> {
    match spec {
        NormalizationSpec::MinMax { min, max } => Box::new(MinMaxNormalizer::new(*min, *max)),
        NormalizationSpec::Percentile { baseline } => {
            Box::new(PercentileNormalizer::new(baseline))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_max_rescales_linearly() {
        let norm = MinMaxNormalizer::new(0.0, 0.2);
        assert!((norm.normalize(0.1) - 0.5).abs() < 1e-12);
        assert!((norm.normalize(0.05) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_min_max_clamps_overshoot() {
        let norm = MinMaxNormalizer::new(0.0, 1.0);
        assert_eq!(norm.normalize(-0.5), 0.0);
        assert_eq!(norm.normalize(2.5), 1.0);
    }

    #[test]
    fn test_percentile_endpoints() {
        let norm = PercentileNormalizer::new(&[0.3, 0.1, 0.2, 0.4]);
        assert_eq!(norm.normalize(0.05), 0.0);
        assert_eq!(norm.normalize(0.1), 0.0);
        assert_eq!(norm.normalize(0.4), 1.0);
        assert_eq!(norm.normalize(9.0), 1.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let norm = PercentileNormalizer::new(&[0.0, 1.0, 2.0]);
        assert!((norm.normalize(0.5) - 0.25).abs() < 1e-12);
        assert!((norm.normalize(1.5) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_percentile_is_monotonic() {
        let norm = PercentileNormalizer::new(&[0.1, 0.4, 0.4, 0.9, 1.3]);
        let mut previous = 0.0;
        for i in 0..=140 {
            let raw = f64::from(i) * 0.01;
            let scaled = norm.normalize(raw);
            assert!(scaled >= previous, "not monotonic at raw={raw}");
            assert!((0.0..=1.0).contains(&scaled));
            previous = scaled;
        }
    }

    #[test]
    fn test_build_from_spec() {
        let spec = NormalizationSpec::MinMax { min: 0.0, max: 2.0 };
        assert!((build_normalizer(&spec).normalize(1.0) - 0.5).abs() < 1e-12);

        let spec = NormalizationSpec::Percentile {
            baseline: vec![1.0, 3.0],
        };
        assert!((build_normalizer(&spec).normalize(2.0) - 0.5).abs() < 1e-12);
    }
}
