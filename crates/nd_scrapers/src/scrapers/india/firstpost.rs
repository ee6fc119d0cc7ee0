use chrono::{DateTime, Utc};
use nd_core::{Category, Source};

use crate::scrapers::dates;
use crate::scrapers::extract::{DetailRules, ListingRules, Locator};
use crate::scrapers::SourceAdapter;

const CATEGORY_PATHS: &[(Category, &str)] = &[
    (Category::Tech, "/category/tech"),
    (Category::Politics, "/category/politics"),
    (Category::Sports, "/category/sports"),
    (Category::Business, "/category/business"),
    (Category::Entertainment, "/category/entertainment"),
    (Category::Health, "/category/health"),
    (Category::Science, "/category/science"),
    (Category::World, "/category/world"),
];

const CATEGORY_SYNONYMS: &[(&str, Category)] = &[
    ("technology", Category::Tech),
    ("cricket", Category::Sports),
    ("economy", Category::Business),
    ("india", Category::Politics),
];

static LISTING: ListingRules = ListingRules {
    container: ".big-thumb",
    title: Locator::text(".main-title"),
    summary: Locator::text(".copy"),
    link: Locator::attr("a[href]", &["href"]),
    image: Locator::attr("img", &["src", "data-src"]),
    published: Locator::text(".article-date"),
};

static DETAIL: DetailRules = DetailRules {
    content: ".art-content",
    author: ".article-author-name",
    tags: ".tags-list a",
};

/// Datelines are printed in Indian Standard Time.
const IST_OFFSET_SECS: i32 = 5 * 3600 + 1800;

const IST_FORMATS: &[&str] = &["%B %d, %Y, %H:%M:%S", "%B %d, %Y, %H:%M", "%B %d, %Y %H:%M:%S"];

#[derive(Debug, Clone, Default)]
pub struct FirstpostAdapter;

impl FirstpostAdapter {
    pub fn new() -> Self {
        Self
    }

    const BASE_URL: &'static str = "https://www.firstpost.com";
}

impl SourceAdapter for FirstpostAdapter {
    fn source(&self) -> Source {
        Source::Firstpost
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
        "Firstpost Staff"
    }

    /// `April 10, 2023, 10:30:12 IST` style datelines, else any loose date.
    fn parse_published_date(&self, raw: &str) -> DateTime<Utc> {
        let local = raw
            .trim()
            .trim_end_matches("(IST)")
            .trim_end()
            .trim_end_matches("IST")
            .trim_end();
        let parsed = dates::parse_at_offset(local, IST_FORMATS, IST_OFFSET_SECS)
            .or_else(|| dates::parse_free_form(local));
        dates::or_now(parsed)
    }
}
