use std::sync::Arc;

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use nd_core::{
    Article, ArticleStorage, Candidate, CandidateOutcome, Category, IngestionReport, Result,
    ScrapeConfig, Source,
};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::fetch::Fetcher;
use crate::logging::Logger;
use crate::scrapers::{AdapterRegistry, SourceAdapter};

/// Catalogue entry for one registered source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSummary {
    pub key: &'static str,
    pub name: &'static str,
    pub base_url: &'static str,
    pub categories: Vec<Category>,
}

/// Runs scraping jobs: listing page, bounded per-article ingestion, report.
pub struct ScraperManager {
    storage: Arc<dyn ArticleStorage>,
    fetcher: Arc<dyn Fetcher>,
    registry: AdapterRegistry,
    config: ScrapeConfig,
}

impl ScraperManager {
    pub fn new(storage: Arc<dyn ArticleStorage>, fetcher: Arc<dyn Fetcher>, config: ScrapeConfig) -> Self {
        Self {
            storage,
            fetcher,
            registry: AdapterRegistry::default(),
            config,
        }
    }

    pub fn with_registry(mut self, registry: AdapterRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    pub fn storage(&self) -> Arc<dyn ArticleStorage> {
        self.storage.clone()
    }

    pub fn sources(&self) -> Vec<SourceSummary> {
        self.registry
            .adapters()
            .iter()
            .map(|adapter| SourceSummary {
                key: adapter.source().key(),
                name: adapter.source().name(),
                base_url: adapter.base_url(),
                categories: adapter.categories(),
            })
            .collect()
    }

    /// Runs one job for `source` and `category`.
    ///
    /// Unknown sources and unmapped categories fail before anything is
    /// fetched. A listing page that cannot be fetched yields an empty report.
    /// Per-article failures are counted in the report and never abort the job.
    pub async fn run(&self, source: &str, category: &str, limit: Option<usize>) -> Result<IngestionReport> {
        let adapter = self.registry.get(source)?;
        let listing_url = adapter.resolve_category_url(category)?;
        let category = adapter.normalize_category(category);
        let limit = limit.unwrap_or(self.config.default_limit);

        let logger = Logger::new().with_new_prefixes(format!("[{}/{}]", adapter.source(), category.key()));
        self.run_job(adapter, listing_url, category, limit, logger).await
    }

    /// Runs a job for every category the source maps, concurrently.
    pub async fn run_source(&self, source: &str, limit: Option<usize>) -> Result<Vec<IngestionReport>> {
        let adapter = self.registry.get(source)?;
        let jobs = adapter
            .categories()
            .into_iter()
            .map(|category| self.run(source, category.key(), limit));

        join_all(jobs).await.into_iter().collect()
    }

    async fn run_job(
        &self,
        adapter: Arc<dyn SourceAdapter>,
        listing_url: Url,
        category: Category,
        limit: usize,
        logger: Logger,
    ) -> Result<IngestionReport> {
        let source = adapter.source();
        logger.info(&format!("🔍 Fetching listing {}", listing_url));

        let listing = match self.fetcher.fetch(listing_url.as_str()).await {
            Ok(listing) => listing,
            Err(e) => {
                logger.warn(&format!("⚠️ Listing fetch failed for {}: {}", listing_url, e));
                return Ok(IngestionReport::new(source, category, Vec::new()));
            }
        };

        let candidates = adapter.list_candidates(&listing, category, limit)?;
        logger.info(&format!("📰 Found {} candidates", candidates.len()));
        for candidate in &candidates {
            logger.debug(&format!("• {}", candidate.url));
        }

        let mut report = IngestionReport::new(source, category, candidates.clone());
        let total = candidates.len();

        let context = IngestContext {
            storage: self.storage.clone(),
            fetcher: self.fetcher.clone(),
            adapter,
            category,
        };
        let jobs: Vec<_> = candidates
            .into_iter()
            .map(|candidate| context.clone().ingest(candidate))
            .collect();

        let outcomes: Vec<CandidateOutcome> = stream::iter(jobs)
            .buffer_unordered(self.config.concurrency.max(1))
            .take_until(tokio::time::sleep(self.config.job_timeout))
            .collect()
            .await;

        for outcome in outcomes {
            report.record(outcome);
        }
        report.cancelled_count = total - report.processed_count();
        if report.cancelled_count > 0 {
            logger.warn(&format!(
                "⏱️ Job timed out after {:?}, {} candidates not processed",
                self.config.job_timeout, report.cancelled_count
            ));
        }

        logger.info(&format!(
            "✅ Saved {}, skipped {}, failed {}, cancelled {}",
            report.saved_count, report.skipped_count, report.failed_count, report.cancelled_count
        ));
        Ok(report)
    }
}

/// Owned handles for one candidate's ingestion, so each worker future is `'static`.
#[derive(Clone)]
struct IngestContext {
    storage: Arc<dyn ArticleStorage>,
    fetcher: Arc<dyn Fetcher>,
    adapter: Arc<dyn SourceAdapter>,
    category: Category,
}

impl IngestContext {
    async fn ingest(self, candidate: Candidate) -> CandidateOutcome {
        let url = candidate.url.clone();
        let source: Source = self.adapter.source();

        match self.try_ingest(candidate).await {
            Ok(outcome) => outcome,
            Err(e) if e.is_duplicate() => {
                debug!(%source, category = %self.category, %url, "Lost insert race, already stored");
                CandidateOutcome::Duplicate
            }
            Err(e) => {
                warn!(%source, category = %self.category, %url, error = %e, "Failed to ingest article");
                CandidateOutcome::Failed
            }
        }
    }

    async fn try_ingest(&self, candidate: Candidate) -> Result<CandidateOutcome> {
        if self.storage.exists_by_url(&candidate.url).await? {
            debug!(url = %candidate.url, "Already stored, skipping");
            return Ok(CandidateOutcome::Duplicate);
        }

        let document = self.fetcher.fetch(&candidate.url).await?;
        let detail = self.adapter.extract_detail(&document)?;
        let article = Article::from_parts(candidate, detail);
        self.storage.insert(&article).await?;

        debug!(url = %article.url, "Stored article");
        Ok(CandidateOutcome::Saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FixtureFetcher;
    use async_trait::async_trait;
    use nd_core::{Error, FetchError, StorageError};
    use nd_storage::InMemoryStorage;
    use std::time::Duration;

    const LISTING_URL: &str = "https://www.ndtv.com/gadgets/news";

    fn listing_item(i: usize) -> String {
        format!(
            r#"<div class="news_Itm">
                <h2 class="newsHdng"><a href="/tech/story-{i}">Story {i}</a></h2>
                <p class="newsCont">Summary {i}</p>
                <span class="posted-by">Updated: April 10, 2023 10:30 IST</span>
            </div>"#
        )
    }

    fn listing(n: usize) -> String {
        let items: String = (1..=n).map(listing_item).collect();
        format!("<html><body><div class=\"lisingNews\">{}</div></body></html>", items)
    }

    fn article_url(i: usize) -> String {
        format!("https://www.ndtv.com/tech/story-{}", i)
    }

    fn article_page(i: usize) -> String {
        format!(
            r#"<div class="pst-by-txt"><a>Reporter {i}</a></div>
               <div class="story__content"><p>Body {i}</p></div>
               <div class="tg_wrp"><a>Gadgets</a></div>"#
        )
    }

    fn fixture(n: usize) -> FixtureFetcher {
        (1..=n).fold(FixtureFetcher::new().with_page(LISTING_URL, listing(n)), |fetcher, i| {
            fetcher.with_page(article_url(i), article_page(i))
        })
    }

    fn manager(fetcher: &Arc<FixtureFetcher>, storage: &Arc<InMemoryStorage>, config: ScrapeConfig) -> ScraperManager {
        ScraperManager::new(storage.clone(), fetcher.clone(), config)
    }

    #[tokio::test]
    async fn test_run_saves_articles() {
        let fetcher = Arc::new(fixture(3));
        let storage = Arc::new(InMemoryStorage::new());
        let manager = manager(&fetcher, &storage, ScrapeConfig::default());

        let report = manager.run("ndtv", "tech", Some(10)).await.unwrap();
        assert_eq!(report.source, Source::Ndtv);
        assert_eq!(report.category, Category::Tech);
        assert_eq!(report.articles.len(), 3);
        assert_eq!(report.saved_count, 3);
        assert_eq!(storage.count().await.unwrap(), 3);

        let stored = storage.get(&article_url(1)).await.unwrap();
        assert_eq!(stored.title, "Story 1");
        assert_eq!(stored.summary, "Summary 1");
        assert_eq!(stored.content, "Body 1");
        assert_eq!(stored.author, "Reporter 1");
        assert_eq!(stored.keywords, vec!["Gadgets"]);
        assert_eq!(stored.category, Category::Tech);
        assert_eq!(stored.source, Source::Ndtv);
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let fetcher = Arc::new(fixture(12));
        let storage = Arc::new(InMemoryStorage::new());
        let manager = manager(&fetcher, &storage, ScrapeConfig::default());

        let first = manager.run("ndtv", "tech", Some(10)).await.unwrap();
        assert_eq!(first.saved_count, 10);
        assert_eq!(first.articles.len(), 10);

        let second = manager.run("ndtv", "tech", Some(10)).await.unwrap();
        assert_eq!(second.saved_count, 0);
        assert_eq!(second.skipped_count, 10);
        assert_eq!(second.articles.len(), 10);
        assert_eq!(storage.count().await.unwrap(), 10);

        // Stored urls are never fetched again.
        assert_eq!(fetcher.hits(&article_url(1)), 1);
        assert_eq!(fetcher.hits(&article_url(11)), 0);
    }

    #[tokio::test]
    async fn test_failed_candidate_does_not_abort_job() {
        let fetcher = Arc::new(fixture(10).with_failure(article_url(5), FetchError::HttpStatus(500)));
        let storage = Arc::new(InMemoryStorage::new());
        let manager = manager(&fetcher, &storage, ScrapeConfig::default());

        let report = manager.run("ndtv", "tech", Some(10)).await.unwrap();
        assert_eq!(report.articles.len(), 10);
        assert_eq!(report.saved_count, 9);
        assert_eq!(report.failed_count, 1);
        assert!(!storage.exists_by_url(&article_url(5)).await.unwrap());
        assert!(storage.exists_by_url(&article_url(6)).await.unwrap());
    }

    /// Wraps the memory store and fails one url on the chosen operation.
    struct FailingStorage {
        inner: InMemoryStorage,
        url: String,
        fail_lookup: bool,
    }

    impl FailingStorage {
        fn broken(&self, url: &str) -> Result<()> {
            if url == self.url {
                return Err(StorageError::Backend("disk full".to_string()).into());
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ArticleStorage for FailingStorage {
        async fn exists_by_url(&self, url: &str) -> Result<bool> {
            if self.fail_lookup {
                self.broken(url)?;
            }
            self.inner.exists_by_url(url).await
        }

        async fn insert(&self, article: &Article) -> Result<()> {
            if !self.fail_lookup {
                self.broken(&article.url)?;
            }
            self.inner.insert(article).await
        }

        async fn count(&self) -> Result<usize> {
            self.inner.count().await
        }
    }

    #[tokio::test]
    async fn test_storage_errors_fail_only_their_candidate() {
        for fail_lookup in [false, true] {
            let fetcher = Arc::new(fixture(4));
            let storage = Arc::new(FailingStorage {
                inner: InMemoryStorage::new(),
                url: article_url(2),
                fail_lookup,
            });
            let manager = ScraperManager::new(storage.clone(), fetcher.clone(), ScrapeConfig::default());

            let report = manager.run("ndtv", "tech", None).await.unwrap();
            assert_eq!(report.saved_count, 3, "fail_lookup={}", fail_lookup);
            assert_eq!(report.failed_count, 1);
            assert_eq!(report.skipped_count, 0);
            assert_eq!(storage.inner.count().await.unwrap(), 3);
            assert!(storage.inner.get(&article_url(2)).await.is_none());
            // A failed lookup stops before the article page is fetched.
            assert_eq!(fetcher.hits(&article_url(2)), usize::from(!fail_lookup));
        }
    }

    #[tokio::test]
    async fn test_article_without_content_is_not_stored() {
        let fetcher = Arc::new(fixture(2).with_page(article_url(2), "<html><body>Paywalled</body></html>"));
        let storage = Arc::new(InMemoryStorage::new());
        let manager = manager(&fetcher, &storage, ScrapeConfig::default());

        let report = manager.run("ndtv", "tech", None).await.unwrap();
        assert_eq!(report.saved_count, 1);
        assert_eq!(report.failed_count, 1);
        assert!(!storage.exists_by_url(&article_url(2)).await.unwrap());
    }

    #[tokio::test]
    async fn test_entries_missing_fields_do_not_count_toward_limit() {
        let page = format!(
            "{}<div class=\"news_Itm\"><h2 class=\"newsHdng\">No link</h2></div>{}{}",
            listing_item(1),
            listing_item(3),
            listing_item(4)
        );
        let fetcher = Arc::new(fixture(4).with_page(LISTING_URL, page));
        let storage = Arc::new(InMemoryStorage::new());
        let manager = manager(&fetcher, &storage, ScrapeConfig::default());

        let report = manager.run("ndtv", "tech", Some(3)).await.unwrap();
        let titles: Vec<_> = report.articles.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Story 1", "Story 3", "Story 4"]);
        assert_eq!(report.saved_count, 3);
    }

    #[tokio::test]
    async fn test_default_limit_comes_from_config() {
        let fetcher = Arc::new(fixture(8));
        let storage = Arc::new(InMemoryStorage::new());
        let config = ScrapeConfig {
            default_limit: 3,
            ..ScrapeConfig::default()
        };
        let manager = manager(&fetcher, &storage, config);

        let report = manager.run("ndtv", "tech", None).await.unwrap();
        assert_eq!(report.articles.len(), 3);
        assert_eq!(report.saved_count, 3);
    }

    #[tokio::test]
    async fn test_listing_failure_yields_empty_report() {
        let fetcher = Arc::new(FixtureFetcher::new().with_failure(LISTING_URL, FetchError::Timeout));
        let storage = Arc::new(InMemoryStorage::new());
        let manager = manager(&fetcher, &storage, ScrapeConfig::default());

        let report = manager.run("ndtv", "tech", Some(10)).await.unwrap();
        assert!(report.articles.is_empty());
        assert_eq!(report.saved_count, 0);
        assert_eq!(report.processed_count(), 0);
        assert_eq!(storage.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_job_level_errors_fetch_nothing() {
        let fetcher = Arc::new(fixture(3));
        let storage = Arc::new(InMemoryStorage::new());
        let manager = manager(&fetcher, &storage, ScrapeConfig::default());

        let err = manager.run("bbc", "tech", None).await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedSource(ref s) if s == "bbc"));

        let err = manager.run("ndtv", "weather", None).await.unwrap_err();
        assert!(matches!(err, Error::InvalidCategory { .. }));
        assert!(err.is_job_level());

        assert_eq!(fetcher.total_hits(), 0);
    }

    #[tokio::test]
    async fn test_category_is_case_insensitive() {
        let fetcher = Arc::new(fixture(1));
        let storage = Arc::new(InMemoryStorage::new());
        let manager = manager(&fetcher, &storage, ScrapeConfig::default());

        let report = manager.run("NDTV", "TECH", None).await.unwrap();
        assert_eq!(report.category, Category::Tech);
        assert_eq!(report.saved_count, 1);
    }

    #[tokio::test]
    async fn test_duplicate_url_in_listing_is_stored_once() {
        let page = format!("{}{}", listing_item(1), listing_item(1));
        let fetcher = Arc::new(fixture(1).with_page(LISTING_URL, page));
        let storage = Arc::new(InMemoryStorage::new());
        let manager = manager(&fetcher, &storage, ScrapeConfig::default());

        let report = manager.run("ndtv", "tech", None).await.unwrap();
        assert_eq!(report.articles.len(), 2);
        assert_eq!(report.saved_count, 1);
        assert_eq!(report.skipped_count, 1);
        assert_eq!(storage.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sequential_processing() {
        let fetcher = Arc::new(fixture(5).with_failure(article_url(2), FetchError::Network("reset".into())));
        let storage = Arc::new(InMemoryStorage::new());
        let config = ScrapeConfig {
            concurrency: 1,
            ..ScrapeConfig::default()
        };
        let manager = manager(&fetcher, &storage, config);

        let report = manager.run("ndtv", "tech", None).await.unwrap();
        assert_eq!(report.saved_count, 4);
        assert_eq!(report.failed_count, 1);
        assert_eq!(report.cancelled_count, 0);
    }

    #[tokio::test]
    async fn test_job_timeout_cancels_outstanding_work() {
        let fetcher = Arc::new(fixture(6).with_delay(article_url(3), Duration::from_secs(5)));
        let storage = Arc::new(InMemoryStorage::new());
        let config = ScrapeConfig {
            job_timeout: Duration::from_millis(300),
            ..ScrapeConfig::default()
        };
        let manager = manager(&fetcher, &storage, config);

        let report = manager.run("ndtv", "tech", None).await.unwrap();
        assert_eq!(report.articles.len(), 6);
        assert_eq!(report.cancelled_count, 1);
        assert_eq!(report.saved_count, 5);
        assert_eq!(report.processed_count() + report.cancelled_count, report.articles.len());
        assert!(!storage.exists_by_url(&article_url(3)).await.unwrap());
    }

    #[tokio::test]
    async fn test_run_source_covers_every_category() {
        let fetcher = Arc::new(fixture(2));
        let storage = Arc::new(InMemoryStorage::new());
        let manager = manager(&fetcher, &storage, ScrapeConfig::default());

        let reports = manager.run_source("ndtv", None).await.unwrap();
        assert_eq!(reports.len(), Category::ALL.len());

        let tech = reports.iter().find(|r| r.category == Category::Tech).unwrap();
        assert_eq!(tech.saved_count, 2);
        for report in reports.iter().filter(|r| r.category != Category::Tech) {
            assert!(report.articles.is_empty());
        }

        assert!(manager.run_source("bbc", None).await.is_err());
    }

    #[tokio::test]
    async fn test_injected_registry() {
        let fetcher = Arc::new(fixture(1));
        let storage = Arc::new(InMemoryStorage::new());
        let ndtv: crate::scrapers::AdapterFactory = || Box::new(crate::scrapers::india::NdtvAdapter::new());
        let registry = AdapterRegistry::from_factories(vec![ndtv]);
        let manager = manager(&fetcher, &storage, ScrapeConfig::default()).with_registry(registry);

        assert_eq!(manager.registry().adapters().len(), 1);
        assert_eq!(manager.run("ndtv", "tech", None).await.unwrap().saved_count, 1);

        let err = manager.run("wion", "tech", None).await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedSource(_)));
    }

    #[test]
    fn test_sources_catalogue() {
        let manager = ScraperManager::new(
            Arc::new(InMemoryStorage::new()),
            Arc::new(FixtureFetcher::new()),
            ScrapeConfig::default(),
        );
        let sources = manager.sources();
        let keys: Vec<_> = sources.iter().map(|s| s.key).collect();
        assert_eq!(keys, vec!["wion", "firstpost", "ndtv", "thewire"]);
        assert!(sources.iter().all(|s| s.categories.len() == Category::ALL.len()));
    }
}
