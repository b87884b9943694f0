//! Seams toward the data collaborators. The scoring core itself is pure
//! and synchronous; these traits let callers resolve snapshots from files,
//! exchanges, or fixtures before invoking it.

use crate::types::{EconomicEvent, PriceSeries};
use anyhow::Result;
use async_trait::async_trait;

/// Supplies the candle history snapshot for one trading pair.
#[async_trait]
pub trait CandleSource: Send + Sync {
    async fn candles(&self, pair: &str) -> Result<PriceSeries>;
}

/// Supplies the economic calendar snapshot shared by all pairs in a cycle.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn events(&self) -> Result<Vec<EconomicEvent>>;
}
