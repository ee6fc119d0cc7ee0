use std::sync::Arc;

use chrono::{DateTime, Utc};
use nd_core::{ArticleDetail, Candidate, Category, Error, ExtractionError, Result, Source};
use scraper::{ElementRef, Html};
use tracing::debug;
use url::Url;

pub mod dates;
pub mod extract;
pub mod india;
pub mod jsonld;

use extract::{CompiledListing, DetailRules, ListingRules};

/// Per-source scraping rules.
///
/// Implementors are plain tables: category paths, synonyms, selectors and a
/// date rule. Listing and detail extraction are provided on top of them, so a
/// layout change on one site only touches that site's tables.
pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> Source;

    fn base_url(&self) -> &'static str;

    /// Path fragment of each category listing page
    fn category_paths(&self) -> &'static [(Category, &'static str)];

    /// Source vocabulary on top of the canonical category names
    fn category_synonyms(&self) -> &'static [(&'static str, Category)];

    fn listing_rules(&self) -> &'static ListingRules;

    fn detail_rules(&self) -> &'static DetailRules;

    /// Byline used when a page names no author
    fn default_author(&self) -> &'static str;

    /// Never fails: unparseable input yields the current time.
    fn parse_published_date(&self, raw: &str) -> DateTime<Utc>;

    /// Registry keys this adapter answers to
    fn cli_names(&self) -> Vec<&'static str> {
        vec![self.source().key()]
    }

    fn categories(&self) -> Vec<Category> {
        self.category_paths().iter().map(|(category, _)| *category).collect()
    }

    fn resolve_category_url(&self, category: &str) -> Result<Url> {
        let key = category.trim().to_lowercase();
        let path = self
            .category_paths()
            .iter()
            .find(|(c, _)| c.key() == key)
            .map(|(_, path)| *path)
            .ok_or_else(|| Error::InvalidCategory {
                source_name: self.source().name().to_string(),
                category: category.to_string(),
            })?;
        Ok(Url::parse(self.base_url())?.join(path)?)
    }

    fn normalize_category(&self, raw: &str) -> Category {
        let key = raw.trim().to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.key() == key)
            .or_else(|| {
                self.category_synonyms()
                    .iter()
                    .find(|(synonym, _)| *synonym == key)
                    .map(|(_, category)| *category)
            })
            .unwrap_or_default()
    }

    fn normalize_image_url(&self, raw: &str) -> String {
        extract::normalize_image_url(raw, self.base_url())
    }

    /// Up to `limit` candidates from a listing page, in document order.
    ///
    /// Entries without a title or link are skipped and do not count toward
    /// `limit`.
    fn list_candidates(&self, document: &str, category: Category, limit: usize) -> Result<Vec<Candidate>> {
        let rules = self.listing_rules().compile()?;
        let document = Html::parse_document(document);
        let mut candidates = Vec::new();

        for container in document.select(&rules.container) {
            if candidates.len() >= limit {
                break;
            }
            match listing_entry(self, &rules, container, category) {
                Ok(candidate) => candidates.push(candidate),
                Err(e) => debug!(source = %self.source(), error = %e, "Skipping listing entry"),
            }
        }

        Ok(candidates)
    }

    fn extract_detail(&self, document: &str) -> Result<ArticleDetail> {
        let rules = self.detail_rules();
        let document = Html::parse_document(document);

        let content = extract::collect_texts(&document, rules.content)?.join("\n\n");
        if content.is_empty() {
            return Err(ExtractionError::MissingRequiredField("content").into());
        }

        let mut authors = extract::dedup_preserving_order(extract::collect_texts(&document, rules.author)?);
        if authors.is_empty() {
            authors = extract::dedup_preserving_order(jsonld::extract_authors(&document));
        }
        let author = if authors.is_empty() {
            self.default_author().to_string()
        } else {
            authors.join(", ")
        };

        let mut keywords = extract::collect_texts(&document, rules.tags)?;
        if keywords.is_empty() {
            keywords = jsonld::extract_keywords(&document);
        }

        Ok(ArticleDetail {
            content,
            author,
            keywords: extract::dedup_preserving_order(keywords),
        })
    }
}

fn listing_entry<A: SourceAdapter + ?Sized>(
    adapter: &A,
    rules: &CompiledListing,
    container: ElementRef<'_>,
    category: Category,
) -> Result<Candidate> {
    let title = rules
        .title
        .first(container)
        .ok_or(ExtractionError::MissingRequiredField("title"))?;
    let url = rules
        .link
        .first(container)
        .and_then(|href| extract::absolute_url(&href, adapter.base_url()))
        .ok_or(ExtractionError::MissingRequiredField("url"))?;
    let summary = rules.summary.first(container).unwrap_or_default();
    let image_url = rules
        .image
        .first(container)
        .map(|raw| adapter.normalize_image_url(&raw))
        .unwrap_or_default();
    let published = rules.published.first(container).unwrap_or_default();

    Ok(Candidate::new(
        adapter.source(),
        category,
        &title,
        &summary,
        url,
        image_url,
        adapter.parse_published_date(&published),
    ))
}

pub type AdapterFactory = fn() -> Box<dyn SourceAdapter>;

pub fn get_adapter_factories() -> Vec<AdapterFactory> {
    india::get_adapter_factories()
}

/// Maps registry keys to adapter instances.
#[derive(Clone)]
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn SourceAdapter>>,
}

impl AdapterRegistry {
    pub fn from_factories(factories: Vec<AdapterFactory>) -> Self {
        Self {
            adapters: factories.into_iter().map(|factory| Arc::from(factory())).collect(),
        }
    }

    pub fn adapters(&self) -> &[Arc<dyn SourceAdapter>] {
        &self.adapters
    }

    /// Case-insensitive lookup by registry key.
    pub fn get(&self, key: &str) -> Result<Arc<dyn SourceAdapter>> {
        let wanted = key.trim().to_lowercase();
        self.adapters
            .iter()
            .find(|adapter| adapter.cli_names().iter().any(|name| *name == wanted))
            .cloned()
            .ok_or_else(|| Error::UnsupportedSource(key.to_string()))
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::from_factories(get_adapter_factories())
    }
}
