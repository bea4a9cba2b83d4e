use ate_market_scout::aggregator::Aggregator;
use ate_market_scout::config::{AppConfig, load_config};
use ate_market_scout::fetch::ReqwestFetcher;
use ate_market_scout::normalizer::{RuleBasedNormalizer, normalize_equipment, parse_query};
use ate_market_scout::report::{render_listings, render_options};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Look up market listings and prices for a piece of test equipment.
#[derive(Debug, Parser)]
#[command(name = "ate-market-scout", version)]
struct Cli {
    /// Free-text query, e.g. "Agilent 8116A /160/EEC/PLK/UK6"
    query: Option<String>,

    /// Equipment brand; overrides the brand parsed from the query
    #[arg(long)]
    brand: Option<String>,

    /// Equipment model; overrides the model parsed from the query
    #[arg(long)]
    model: Option<String>,

    /// Slash-separated option codes, e.g. "B711/B86"
    #[arg(long)]
    options: Option<String>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for request pauses and placeholder prices
    #[arg(long)]
    seed: Option<u64>,

    /// Print a single JSON document and nothing else
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout stays clean for JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config: AppConfig = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("Config load error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let parsed = parse_query(cli.query.as_deref().unwrap_or(""));
    let brand = cli.brand.unwrap_or(parsed.brand);
    let model = cli.model.unwrap_or(parsed.model);
    let raw_options = cli.options.unwrap_or(parsed.raw_options);

    if brand.is_empty() && model.is_empty() {
        error!("Nothing to search for: pass a query or --brand/--model");
        return ExitCode::FAILURE;
    }

    let fetcher = match ReqwestFetcher::new(&config.http) {
        Ok(f) => Arc::new(f),
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Parsing equipment data...");
    let payload = normalize_equipment(&RuleBasedNormalizer::new(), &brand, &model, &raw_options).await;

    info!("Searching market data...");
    let aggregator = Aggregator::from_config(&config, fetcher);
    let result = aggregator.aggregate(&brand, &model).await;

    if cli.json {
        let doc = serde_json::json!({ "analysis": payload, "market": result });
        match serde_json::to_string_pretty(&doc) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                error!("Failed to serialize result: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    println!("Equipment analysis:");
    println!("{}", serde_json::to_string_pretty(&payload).unwrap_or_default());
    println!();
    println!("Options:");
    print!("{}", render_options(&payload.normalized));
    println!();
    println!("Market listings:");
    println!("{}", serde_json::to_string_pretty(&result).unwrap_or_default());
    println!();
    print!("{}", render_listings(&result));

    ExitCode::SUCCESS
}
