use async_trait::async_trait;
use crate::types::Article;
use crate::Result;

/// Write path the ingestion pipeline needs from persistence.
///
/// Implementations must enforce `url` uniqueness themselves: `insert` on an
/// existing url fails with `StorageError::DuplicateKey` and leaves the stored
/// record untouched.
#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Returns true if an article with this url is already stored
    async fn exists_by_url(&self, url: &str) -> Result<bool>;

    /// Store a new article
    async fn insert(&self, article: &Article) -> Result<()>;

    /// Number of stored articles
    async fn count(&self) -> Result<usize>;
}
