pub mod cli;
pub mod fetch;
pub mod logging;
pub mod manager;
pub mod scrapers;

pub use cli::{handle_command, ScraperArgs, ScraperCommands};
pub use fetch::{Fetcher, FixtureFetcher, HttpFetcher};
pub use logging::{init_logging, Logger};
pub use manager::{ScraperManager, SourceSummary};
pub use scrapers::{AdapterRegistry, SourceAdapter};

pub mod prelude {
    pub use super::fetch::Fetcher;
    pub use super::scrapers::SourceAdapter;
    pub use nd_core::{Article, Error, Result};
}
