use anyhow::Result;
use market_monitor_core::ConfigLoader;
use market_monitor_engine::RuleTable;

pub fn run(config_path: &str) -> Result<()> {
    let config = ConfigLoader::load_from(config_path)?;
    let table = RuleTable::new(config.rules)?;

    println!("recommendation rules (evaluated top-down, first match wins):");
    for (i, rule) in table.rules().iter().enumerate() {
        println!(
            "{:>2}. volatility {} {:.2} AND event impact {} {:.2}  ->  {} ({})",
            i + 1,
            rule.volatility_cmp,
            rule.volatility_threshold,
            rule.event_cmp,
            rule.event_threshold,
            rule.action,
            rule.risk_level
        );
    }
    Ok(())
}
