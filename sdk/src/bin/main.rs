//! Market actions CLI
//!
//! Prepares extend and refund incentive actions from JSON fixtures and
//! prints the prepared action as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use market_sdk::{
    ActionFixture, Clock, ExtendIncentivesAction, ExtendIncentivesParams, FixedClock, MarketAction,
    MarketActionContext, PreparedMarketAction, RefundIncentivesAction, RefundIncentivesParams, SdkConfig,
    StaticContractRegistry, SystemClock,
};
use serde::de::DeserializeOwned;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use validator::Validate;

#[derive(Parser)]
#[command(name = "market-actions")]
#[command(about = "Prepare incentive actions for vault markets", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "market-actions.toml")]
    config: PathBuf,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare an extend-incentives action
    Extend {
        /// Fixture with market data and the request
        #[arg(long)]
        fixture: PathBuf,
    },

    /// Prepare a refund-incentives action
    Refund {
        #[arg(long)]
        fixture: PathBuf,
    },

    /// Validate the configuration and exit
    ValidateConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_found = cli.config.exists();
    let mut config = if config_found {
        SdkConfig::from_file(&cli.config)
            .with_context(|| format!("failed to load config {}", cli.config.display()))?
    } else {
        SdkConfig::default()
    };

    if let Some(log_level) = cli.log_level {
        config.logging.level = log_level;
    }
    config.validate()?;

    init_logging(&config);
    if !config_found {
        warn!("Config file not found, using defaults: {}", cli.config.display());
    }

    let prepared = match cli.command {
        Commands::ValidateConfig => {
            info!(
                tokens = config.tokens.len(),
                contracts = config.contracts.len(),
                "Configuration is valid"
            );
            return Ok(());
        }
        Commands::Extend { fixture } => {
            let (context, params) = load_fixture::<ExtendIncentivesParams>(&config, &fixture)?;
            ExtendIncentivesAction::new(context).prepare(&params).await
        }
        Commands::Refund { fixture } => {
            let (context, params) = load_fixture::<RefundIncentivesParams>(&config, &fixture)?;
            RefundIncentivesAction::new(context).prepare(&params).await
        }
    };

    print_prepared(&prepared)
}

fn load_fixture<P: DeserializeOwned>(
    config: &SdkConfig,
    path: &Path,
) -> Result<(Arc<MarketActionContext>, P)> {
    let fixture = ActionFixture::<P>::from_file(path)
        .with_context(|| format!("failed to load fixture {}", path.display()))?;
    let readers = fixture.readers()?;

    let clock: Arc<dyn Clock> = match fixture.now {
        Some(now) => Arc::new(FixedClock::new(now)),
        None => Arc::new(SystemClock),
    };
    debug!(now = clock.now(), chain_id = fixture.chain_id, "Loaded fixture");

    let context = MarketActionContext::new(
        Arc::new(readers.market),
        Arc::new(readers.quotes),
        Arc::new(readers.allowances),
        Arc::new(StaticContractRegistry::from_config(config)?),
    )
    .with_config(config)
    .with_clock(clock);

    Ok((Arc::new(context), fixture.request))
}

fn print_prepared(prepared: &PreparedMarketAction) -> Result<()> {
    info!(
        valid = prepared.is_valid.status,
        message = %prepared.is_valid.message,
        calls = prepared.write_contract_options.len(),
        "Prepared market action"
    );
    println!("{}", serde_json::to_string_pretty(prepared)?);
    Ok(())
}

fn init_logging(config: &SdkConfig) {
    let level = config.logging.level.to_ascii_lowercase();
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("market_sdk={level},market_actions={level}").into());

    // Logs go to stderr so stdout stays valid JSON
    if config.logging.structured {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
