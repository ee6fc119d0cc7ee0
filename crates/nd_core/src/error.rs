use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported news source: {0}")]
    UnsupportedSource(String),

    #[error("Invalid category for {source_name}: {category}")]
    InvalidCategory { source_name: String, category: String },

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Job-level errors abort a scraping job before any fetch is attempted.
    pub fn is_job_level(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedSource(_) | Error::InvalidCategory { .. } | Error::Config(_)
        )
    }

    /// True when an insert was rejected because the url is already stored.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Error::Storage(StorageError::DuplicateKey(_)))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),
}

impl FetchError {
    /// Transient failures are worth one more attempt; a status code is an answer.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Timeout | FetchError::Network(_))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, Error>;
