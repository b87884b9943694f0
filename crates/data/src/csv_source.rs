//! CSV candle snapshots, one file per pair.

use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use market_monitor_core::traits::CandleSource;
use market_monitor_core::types::{Candle, PriceSeries};
use rust_decimal::Decimal;

/// Reads `<dir>/<PAIR>.csv` files with the header
/// `timestamp,open,high,low,close,volume`.
pub struct CsvCandleSource {
    dir: PathBuf,
}

impl CsvCandleSource {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl CandleSource for CsvCandleSource {
    async fn candles(&self, pair: &str) -> Result<PriceSeries> {
        let path = self.dir.join(format!("{pair}.csv"));
        let file = std::fs::File::open(&path)
            .with_context(|| format!("opening candle snapshot {}", path.display()))?;
        let series = parse_candles(file, pair)
            .with_context(|| format!("parsing candle snapshot {}", path.display()))?;
        tracing::debug!(pair, candles = series.len(), "candle snapshot loaded");
        Ok(series)
    }
}

/// Parses candle rows from a CSV reader and builds a validated series.
///
/// Rows are sorted by timestamp before validation, so unordered snapshots
/// are accepted.
///
/// # Errors
///
/// Returns an error on malformed rows or when the sorted candles violate
/// the series invariants (e.g. duplicate timestamps, non-positive prices).
pub fn parse_candles(reader: impl Read, pair: &str) -> Result<PriceSeries> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut candles = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        let timestamp: DateTime<Utc> = record[0].parse()?;
        let open = Decimal::from_str(&record[1])?;
        let high = Decimal::from_str(&record[2])?;
        let low = Decimal::from_str(&record[3])?;
        let close = Decimal::from_str(&record[4])?;
        let volume = Decimal::from_str(&record[5])?;

        candles.push(Candle {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    candles.sort_by_key(|c| c.timestamp);
    Ok(PriceSeries::new(pair, candles)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = "\
timestamp,open,high,low,close,volume
2026-02-02T00:00:00Z,101.0,106.0,99.0,104.0,1200
2026-02-01T00:00:00Z,100.0,105.0,98.0,101.0,1000
2026-02-03T00:00:00Z,104.0,110.0,103.0,109.0,900
";

    #[test]
    fn test_parses_and_sorts_rows() {
        let series = parse_candles(SNAPSHOT.as_bytes(), "BTCUSDT").unwrap();
        assert_eq!(series.len(), 3);
        let closes = series.closes().unwrap();
        assert_eq!(closes, vec![101.0, 104.0, 109.0]);
    }

    #[test]
    fn test_rejects_malformed_row() {
        let bad = "timestamp,open,high,low,close,volume\n2026-02-01T00:00:00Z,a,b,c,d,e\n";
        assert!(parse_candles(bad.as_bytes(), "BTCUSDT").is_err());
    }

    #[test]
    fn test_rejects_invalid_series() {
        let bad = "\
timestamp,open,high,low,close,volume
2026-02-01T00:00:00Z,100.0,105.0,98.0,-101.0,1000
";
        assert!(parse_candles(bad.as_bytes(), "BTCUSDT").is_err());
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_an_error() {
        let source = CsvCandleSource::new("/nonexistent/snapshots");
        assert!(source.candles("BTCUSDT").await.is_err());
    }
}
