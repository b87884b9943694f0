use anyhow::Result;
use market_monitor_core::ConfigLoader;
use market_monitor_engine::Evaluator;

pub fn run(config_path: &str) -> Result<()> {
    let config = ConfigLoader::load_from(config_path)?;
    // Constructing the evaluator runs full validation, including the rule
    // table totality check.
    let evaluator = Evaluator::new(config)?;
    println!(
        "configuration OK: {} pairs, {} rules",
        evaluator.config().pairs.len(),
        evaluator.rules().rules().len()
    );
    Ok(())
}
