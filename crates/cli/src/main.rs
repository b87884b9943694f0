use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "market-monitor")]
#[command(about = "Crypto market risk scoring and trading recommendations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate all configured pairs from snapshot files
    Evaluate {
        /// Directory of per-pair candle CSVs (<PAIR>.csv)
        #[arg(long)]
        candles: String,
        /// Calendar snapshot JSON file
        #[arg(long)]
        events: String,
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
        /// Reference time in ISO 8601 (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },
    /// Validate the configuration, including rule table totality
    CheckConfig {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
    },
    /// Print the ordered recommendation rule table
    Rules {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Evaluate {
            candles,
            events,
            config,
            at,
        } => commands::evaluate::run(&config, &candles, &events, at.as_deref()).await,
        Commands::CheckConfig { config } => commands::check_config::run(&config),
        Commands::Rules { config } => commands::rules::run(&config),
    }
}
