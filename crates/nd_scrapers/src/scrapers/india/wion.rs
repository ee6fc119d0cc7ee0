use chrono::{DateTime, Utc};
use nd_core::{Category, Source};

use crate::scrapers::dates;
use crate::scrapers::extract::{DetailRules, ListingRules, Locator};
use crate::scrapers::SourceAdapter;

const CATEGORY_PATHS: &[(Category, &str)] = &[
    (Category::Tech, "/technology"),
    (Category::Politics, "/world/politics"),
    (Category::Sports, "/sports"),
    (Category::Business, "/business-economy"),
    (Category::Entertainment, "/entertainment"),
    (Category::Health, "/life-fun/health-and-wellness"),
    (Category::Science, "/science"),
    (Category::World, "/world"),
];

const CATEGORY_SYNONYMS: &[(&str, Category)] = &[
    ("technology", Category::Tech),
    ("business-economy", Category::Business),
    ("health-and-wellness", Category::Health),
];

static LISTING: ListingRules = ListingRules {
    container: ".article-list .article-item",
    title: Locator::text(".article-title"),
    summary: Locator::text(".article-summary"),
    link: Locator::attr("a[href]", &["href"]),
    image: Locator::attr("img", &["src", "data-src"]),
    published: Locator::text(".article-date"),
};

static DETAIL: DetailRules = DetailRules {
    content: ".article-content",
    author: ".article-author",
    tags: ".article-tags a",
};

#[derive(Debug, Clone, Default)]
pub struct WionAdapter;

impl WionAdapter {
    pub fn new() -> Self {
        Self
    }

    const BASE_URL: &'static str = "https://www.wionews.com";
}

impl SourceAdapter for WionAdapter {
    fn source(&self) -> Source {
        Source::Wion
    }

    fn base_url(&self) -> &'static str {
        Self::BASE_URL
    }

    fn category_paths(&self) -> &'static [(Category, &'static str)] {
        CATEGORY_PATHS
    }

    fn category_synonyms(&self) -> &'static [(&'static str, Category)] {
        CATEGORY_SYNONYMS
    }

    fn listing_rules(&self) -> &'static ListingRules {
        &LISTING
    }

    fn detail_rules(&self) -> &'static DetailRules {
        &DETAIL
    }

    fn default_author(&self) -> &'static str {
        "WION Staff"
    }

    fn parse_published_date(&self, raw: &str) -> DateTime<Utc> {
        dates::or_now(dates::parse_free_form(raw))
    }
}
