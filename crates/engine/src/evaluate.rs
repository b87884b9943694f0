//! Per-pair evaluation pipeline and the multi-pair batch runner.
//!
//! Each pair is evaluated on its own tokio task. Configuration and the rule
//! table are read-only behind `Arc`s, so tasks share them without
//! coordination, and one pair's failure never cancels its siblings.

use std::sync::Arc;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use market_monitor_core::config::AppConfig;
use market_monitor_core::error::Result;
use market_monitor_core::traits::{CandleSource, EventSource};
use market_monitor_core::types::{EconomicEvent, PriceSeries, Recommendation};

use crate::recommend::recommend;
use crate::rules::RuleTable;

/// Result of one pair's evaluation within a batch.
#[derive(Debug)]
pub struct PairOutcome {
    pub pair: String,
    pub result: anyhow::Result<Recommendation>,
}

/// Scores volatility and event impact and maps them to a recommendation.
#[derive(Clone)]
pub struct Evaluator {
    config: Arc<AppConfig>,
    rules: Arc<RuleTable>,
}

impl Evaluator {
    /// Builds an evaluator from a validated configuration, including the
    /// rule table totality check.
    ///
    /// # Errors
    ///
    /// Returns `RiskError::Configuration` if the configuration is invalid
    /// or the rule table is not total.
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let rules = RuleTable::new(config.rules.clone())?;
        Ok(Self {
            config: Arc::new(config),
            rules: Arc::new(rules),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Evaluates one pair from in-memory snapshots. Pure and synchronous.
    ///
    /// # Errors
    ///
    /// Propagates `InsufficientData`, `Validation`, and
    /// `ComputationOverflow` from the analyzers; all are local to this pair.
    pub fn evaluate_pair(
        &self,
        series: &PriceSeries,
        events: &[EconomicEvent],
        reference_time: DateTime<Utc>,
    ) -> Result<Recommendation> {
        let metrics = market_monitor_volatility::analyze(series, &self.config.volatility)?;
        let event_impact = market_monitor_calendar::score(events, reference_time, &self.config.events);
        recommend(
            series.pair(),
            reference_time,
            metrics.composite_score,
            event_impact,
            &self.rules,
        )
    }

    /// Evaluates every configured pair concurrently.
    ///
    /// The calendar snapshot is fetched once and shared. Candle fetch and
    /// scoring run on one task per pair; a failing pair yields an `Err`
    /// outcome (logged at warn) while the others complete normally.
    /// Outcomes are returned in configured pair order.
    ///
    /// # Errors
    ///
    /// Returns an error only if the shared event snapshot cannot be
    /// fetched; per-pair failures are captured inside the outcomes.
    pub async fn evaluate_batch(
        &self,
        candles: Arc<dyn CandleSource>,
        events: Arc<dyn EventSource>,
        reference_time: DateTime<Utc>,
    ) -> anyhow::Result<Vec<PairOutcome>> {
        let events = Arc::new(events.events().await?);

        let mut handles = Vec::with_capacity(self.config.pairs.len());
        for pair in &self.config.pairs {
            let task_pair = pair.clone();
            let candles = Arc::clone(&candles);
            let events = Arc::clone(&events);
            let evaluator = self.clone();
            let handle = tokio::spawn(async move {
                let result = match candles.candles(&task_pair).await {
                    Ok(series) => evaluator
                        .evaluate_pair(&series, &events, reference_time)
                        .map_err(anyhow::Error::from),
                    Err(e) => Err(e),
                };
                PairOutcome {
                    pair: task_pair,
                    result,
                }
            });
            handles.push((pair.clone(), handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (pair, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                // A panicked task is contained to its pair as well.
                Err(e) => PairOutcome {
                    pair,
                    result: Err(anyhow!("evaluation task failed: {e}")),
                },
            };
            match &outcome.result {
                Ok(rec) => tracing::info!(
                    pair = %outcome.pair,
                    volatility = rec.volatility_score,
                    event_impact = rec.event_impact_score,
                    action = %rec.action,
                    "pair evaluated"
                ),
                Err(e) => tracing::warn!(pair = %outcome.pair, error = %e, "pair skipped"),
            }
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}
