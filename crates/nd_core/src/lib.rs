pub mod config;
pub mod error;
pub mod storage;
pub mod types;

pub use config::ScrapeConfig;
pub use error::{Error, ExtractionError, FetchError, Result, StorageError};
pub use storage::ArticleStorage;
pub use types::{
    Article, ArticleDetail, Candidate, CandidateOutcome, Category, IngestionReport, Source,
    MAX_SUMMARY_CHARS, UNKNOWN_AUTHOR,
};
