use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use market_monitor_core::traits::{CandleSource, EventSource};
use market_monitor_core::ConfigLoader;
use market_monitor_data::{CsvCandleSource, JsonEventSource};
use market_monitor_engine::Evaluator;

pub async fn run(
    config_path: &str,
    candles_dir: &str,
    events_path: &str,
    at: Option<&str>,
) -> Result<()> {
    let config = ConfigLoader::load_from(config_path)?;
    let evaluator = Evaluator::new(config)?;

    let reference_time: DateTime<Utc> = match at {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid reference time {raw:?}"))?,
        None => Utc::now(),
    };

    let candles: Arc<dyn CandleSource> = Arc::new(CsvCandleSource::new(candles_dir));
    let events: Arc<dyn EventSource> = Arc::new(JsonEventSource::new(events_path));

    let outcomes = evaluator
        .evaluate_batch(candles, events, reference_time)
        .await?;

    println!(
        "{:<10} {:>10} {:>12}  {:<24} {}",
        "PAIR", "VOLATILITY", "EVENT IMPACT", "ACTION", "RISK"
    );
    let mut skipped = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(rec) => println!(
                "{:<10} {:>10.2} {:>12.2}  {:<24} {}",
                rec.pair, rec.volatility_score, rec.event_impact_score, rec.action, rec.risk_level
            ),
            Err(e) => {
                skipped += 1;
                println!("{:<10} skipped: {e}", outcome.pair);
            }
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, total = outcomes.len(), "some pairs were skipped");
    }

    Ok(())
}
