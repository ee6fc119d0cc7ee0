use clap::{Args, Subcommand};
use nd_core::{IngestionReport, Result};

use crate::manager::{ScraperManager, SourceSummary};

#[derive(Args, Debug, Clone)]
pub struct ScraperArgs {
    #[command(subcommand)]
    pub command: ScraperCommands,

    /// Print reports as JSON instead of a summary
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScraperCommands {
    /// Scrape one category of one source (e.g. `job ndtv tech`)
    Job {
        /// Source key: wion, firstpost, ndtv, thewire
        source: String,
        /// Category: tech, politics, sports, business, entertainment, health, science, world
        category: String,
        /// Maximum number of listing entries to ingest
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Scrape every category of a source
    All {
        source: String,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List available sources and their categories
    List,
}

pub async fn handle_command(args: &ScraperArgs, manager: &ScraperManager) -> Result<()> {
    match &args.command {
        ScraperCommands::Job { source, category, limit } => {
            let report = manager.run(source, category, *limit).await?;
            print_reports(std::slice::from_ref(&report), args.json)?;
        }
        ScraperCommands::All { source, limit } => {
            let reports = manager.run_source(source, *limit).await?;
            print_reports(&reports, args.json)?;
        }
        ScraperCommands::List => {
            let sources = manager.sources();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&sources)?);
            } else {
                print!("{}", render_sources(&sources));
            }
        }
    }
    Ok(())
}

fn print_reports(reports: &[IngestionReport], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
    } else {
        for report in reports {
            print!("{}", render_report(report));
        }
    }
    Ok(())
}

pub fn render_report(report: &IngestionReport) -> String {
    let mut out = format!(
        "📰 {} / {}: 🆕 {} saved, ⏭️ {} skipped, ❌ {} failed",
        report.source, report.category, report.saved_count, report.skipped_count, report.failed_count
    );
    if report.cancelled_count > 0 {
        out.push_str(&format!(", ⏱️ {} cancelled", report.cancelled_count));
    }
    out.push('\n');
    for article in &report.articles {
        out.push_str(&format!("  - {} - {}\n", article.title, article.url));
    }
    out
}

pub fn render_sources(sources: &[SourceSummary]) -> String {
    let mut out = String::from("Available sources:\n");
    for source in sources {
        let categories: Vec<_> = source.categories.iter().map(|c| c.key()).collect();
        out.push_str(&format!(
            "  {} ({}): {}\n",
            source.key,
            source.name,
            categories.join(", ")
        ));
    }
    out
}
