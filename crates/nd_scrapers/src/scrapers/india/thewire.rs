use chrono::{DateTime, Utc};
use nd_core::{Category, Source};

use crate::scrapers::dates;
use crate::scrapers::extract::{DetailRules, ListingRules, Locator};
use crate::scrapers::SourceAdapter;

const CATEGORY_PATHS: &[(Category, &str)] = &[
    (Category::Tech, "/category/tech"),
    (Category::Politics, "/category/politics"),
    (Category::Sports, "/category/sport"),
    (Category::Business, "/category/economy"),
    (Category::Entertainment, "/category/culture"),
    (Category::Health, "/category/health"),
    (Category::Science, "/category/science"),
    (Category::World, "/category/world"),
];

const CATEGORY_SYNONYMS: &[(&str, Category)] = &[
    ("sport", Category::Sports),
    ("economy", Category::Business),
    ("culture", Category::Entertainment),
];

static LISTING: ListingRules = ListingRules {
    container: ".article-card",
    title: Locator::text(".title"),
    summary: Locator::text(".excerpt"),
    link: Locator::attr("a[href]", &["href"]),
    image: Locator::attr("img", &["src", "data-src"]),
    published: Locator::text(".date"),
};

static DETAIL: DetailRules = DetailRules {
    content: ".entry-content",
    author: ".author-name",
    tags: ".tags a",
};

#[derive(Debug, Clone, Default)]
pub struct TheWireAdapter;

impl TheWireAdapter {
    pub fn new() -> Self {
        Self
    }

    const BASE_URL: &'static str = "https://thewire.in";
}

impl SourceAdapter for TheWireAdapter {
    fn source(&self) -> Source {
        Source::TheWire
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
        "The Wire Staff"
    }

    fn cli_names(&self) -> Vec<&'static str> {
        vec!["thewire", "wire"]
    }

    fn parse_published_date(&self, raw: &str) -> DateTime<Utc> {
        dates::or_now(dates::parse_free_form(raw))
    }
}
