pub mod config;
pub mod config_loader;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{
    AppConfig, CompositeWeights, DecayCurve, EventImpactConfig, NormalizationSpec, SeverityMap,
    VolatilityConfig,
};
pub use config_loader::ConfigLoader;
pub use error::{Result, RiskError};
pub use traits::{CandleSource, EventSource};
pub use types::{
    Candle, EconomicEvent, ImpactLevel, PriceSeries, Recommendation, RecommendationRule,
    RiskLevel, RuleComparator, TradeAction, VolatilityMetrics,
};
