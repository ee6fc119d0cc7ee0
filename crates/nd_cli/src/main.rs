use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use nd_core::ScrapeConfig;
use nd_scrapers::cli::{handle_command, ScraperArgs};
use nd_scrapers::logging::{init_logging, parse_level};
use nd_scrapers::{HttpFetcher, ScraperManager};
use tracing::{error, info, Level};

#[derive(Debug, Clone, Copy, PartialEq)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if let Ok(num) = current_number.parse::<u64>() {
                let scale = match c {
                    's' => 1,
                    'm' => 60,
                    'h' => 3600,
                    'd' => 86400,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                };
                total_seconds = num
                    .checked_mul(scale)
                    .and_then(|secs| total_seconds.checked_add(secs))
                    .ok_or_else(|| "Duration too large".to_string())?;
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A bare trailing number counts as seconds
        if !current_number.is_empty() {
            let num = current_number
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total_seconds = total_seconds
                .checked_add(num)
                .ok_or_else(|| "Duration too large".to_string())?;
            has_unit = true;
        }

        if !has_unit {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Scrape Indian news outlets into a deduplicated article store", long_about = None)]
struct Cli {
    /// Storage backend: memory or sqlite
    #[arg(long, env = "NEWSDESK_STORAGE", default_value = "memory")]
    storage: String,
    /// SQLite database path
    #[arg(long, env = "NEWSDESK_DB")]
    db: Option<String>,
    /// Articles processed in parallel within one job
    #[arg(long)]
    concurrency: Option<usize>,
    /// Per-request timeout (e.g. 15s)
    #[arg(long)]
    fetch_timeout: Option<HumanDuration>,
    /// Wall-clock bound for one job (e.g. 5m)
    #[arg(long)]
    job_timeout: Option<HumanDuration>,
    #[arg(long, env = "NEWSDESK_LOG", default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run scraping jobs
    Scrape {
        /// Repeat forever with this pause between cycles (e.g. 1h, 30m, 1h15m30s)
        #[arg(long)]
        interval: Option<HumanDuration>,
        #[command(flatten)]
        args: ScraperArgs,
    },
    /// Serve the HTTP trigger
    Serve {
        #[arg(long, env = "NEWSDESK_ADDR", default_value = "0.0.0.0:5000")]
        addr: SocketAddr,
    },
}

/// Environment first, then command-line overrides.
fn build_config(cli: &Cli, base: ScrapeConfig) -> nd_core::Result<ScrapeConfig> {
    let mut config = base;
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(HumanDuration(timeout)) = cli.fetch_timeout {
        config.fetch_timeout = timeout;
    }
    if let Some(HumanDuration(timeout)) = cli.job_timeout {
        config.job_timeout = timeout;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(parse_level(&cli.log_level).unwrap_or(Level::INFO));

    let config = build_config(&cli, ScrapeConfig::from_env()?).context("Invalid configuration")?;

    let storage = nd_storage::create_storage(&cli.storage, cli.db.as_deref())
        .await
        .with_context(|| format!("Failed to open {} storage", cli.storage))?;
    let fetcher = Arc::new(HttpFetcher::new(&config)?);
    let manager = Arc::new(ScraperManager::new(storage, fetcher, config));

    let sources: Vec<_> = manager.sources().iter().map(|s| s.name).collect();
    info!("🦗 Scrapers initialized successfully: {}", sources.join(", "));

    match cli.command {
        Commands::Scrape { interval, args } => match interval {
            Some(HumanDuration(interval)) => {
                info!("Running in periodic mode with {}s interval", interval.as_secs());
                loop {
                    info!("Starting scrape cycle");
                    if let Err(e) = handle_command(&args, &manager).await {
                        error!("Error during scrape: {}", e);
                    }
                    info!("Waiting {}s before next scrape", interval.as_secs());
                    tokio::time::sleep(interval).await;
                }
            }
            None => handle_command(&args, &manager).await?,
        },
        Commands::Serve { addr } => {
            nd_web::serve(addr, nd_web::AppState::new(manager)).await?;
        }
    }

    Ok(())
}
