//! JSON calendar snapshots.
//!
//! Accepts the record shape produced by the calendar fetcher: a date and an
//! optional intraday time, qualitative impact, and forecast/previous/actual
//! values as display strings ("3.75%", "180K", "N/A", "").

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use market_monitor_core::traits::EventSource;
use market_monitor_core::types::{EconomicEvent, ImpactLevel};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Reads one JSON array of calendar records.
pub struct JsonEventSource {
    path: PathBuf,
}

impl JsonEventSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl EventSource for JsonEventSource {
    async fn events(&self) -> Result<Vec<EconomicEvent>> {
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading calendar snapshot {}", self.path.display()))?;
        let events = parse_events(&raw)
            .with_context(|| format!("parsing calendar snapshot {}", self.path.display()))?;
        tracing::debug!(events = events.len(), "calendar snapshot loaded");
        Ok(events)
    }
}

#[derive(Debug, Deserialize)]
struct RawCalendarEvent {
    date: String,
    #[serde(default)]
    time: Option<String>,
    event: String,
    country: String,
    impact: String,
    #[serde(default)]
    actual: Option<String>,
    #[serde(default)]
    forecast: Option<String>,
    #[serde(default)]
    previous: Option<String>,
}

/// Parses a JSON array of calendar records into events.
///
/// # Errors
///
/// Returns an error on malformed JSON, bad dates, or unknown impact levels.
/// Numeric fields that are absent or non-numeric become `None`.
pub fn parse_events(raw: &str) -> Result<Vec<EconomicEvent>> {
    let records: Vec<RawCalendarEvent> = serde_json::from_str(raw)?;
    records
        .into_iter()
        .map(|record| {
            let date = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d")
                .with_context(|| format!("bad date in event {:?}", record.event))?;
            let time = match record.time.as_deref() {
                Some(t) if !t.trim().is_empty() => NaiveTime::parse_from_str(t, "%H:%M")
                    .with_context(|| format!("bad time in event {:?}", record.event))?,
                _ => NaiveTime::MIN,
            };
            let impact = ImpactLevel::from_str(&record.impact)?;
            Ok(EconomicEvent {
                timestamp: Utc.from_utc_datetime(&date.and_time(time)),
                name: record.event,
                country: record.country,
                impact,
                actual: parse_value(record.actual.as_deref()),
                forecast: parse_value(record.forecast.as_deref()),
                previous: parse_value(record.previous.as_deref()),
            })
        })
        .collect()
}

// Calendar feeds render numbers for display: percent signs and K/M/B
// magnitude suffixes, with "N/A" or "" for missing values.
fn parse_value(raw: Option<&str>) -> Option<Decimal> {
    let text = raw?.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("n/a") {
        return None;
    }
    let (digits, multiplier) = match text.strip_suffix(['%', 'K', 'M', 'B', 'k']) {
        Some(stripped) => match &text[stripped.len()..] {
            "K" | "k" => (stripped, Decimal::from(1_000)),
            "M" => (stripped, Decimal::from(1_000_000)),
            "B" => (stripped, Decimal::from(1_000_000_000)),
            _ => (stripped, Decimal::ONE), // percent: keep the printed number
        },
        None => (text, Decimal::ONE),
    };
    match Decimal::from_str(digits.trim()) {
        Ok(value) => Some(value * multiplier),
        Err(_) => {
            tracing::debug!(value = text, "unparseable calendar value, dropping");
            None
        }
    }
}
