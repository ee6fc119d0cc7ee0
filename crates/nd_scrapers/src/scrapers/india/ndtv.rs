use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use nd_core::{Category, Source};
use regex::Regex;

use crate::scrapers::dates;
use crate::scrapers::extract::{DetailRules, ListingRules, Locator};
use crate::scrapers::SourceAdapter;

lazy_static! {
    // "Updated: April 10, 2023 10:30 IST" -> "April 10, 2023"
    static ref DATE_IN_BYLINE: Regex = Regex::new(r"\w+ \d+, \d{4}").expect("valid date pattern");
}

const CATEGORY_PATHS: &[(Category, &str)] = &[
    (Category::Tech, "/gadgets/news"),
    (Category::Politics, "/india/politics"),
    (Category::Sports, "/sports"),
    (Category::Business, "/business"),
    (Category::Entertainment, "/entertainment"),
    (Category::Health, "/health"),
    (Category::Science, "/science"),
    (Category::World, "/world-news"),
];

const CATEGORY_SYNONYMS: &[(&str, Category)] = &[
    ("gadgets", Category::Tech),
    ("world-news", Category::World),
];

static LISTING: ListingRules = ListingRules {
    container: ".news_Itm",
    title: Locator::text(".newsHdng"),
    summary: Locator::text(".newsCont"),
    link: Locator::attr("a[href]", &["href"]),
    image: Locator::attr("img", &["src", "data-src"]),
    published: Locator::text(".posted-by"),
};

static DETAIL: DetailRules = DetailRules {
    content: ".story__content",
    author: ".pst-by-txt a",
    tags: ".tg_wrp a",
};

#[derive(Debug, Clone, Default)]
pub struct NdtvAdapter;

impl NdtvAdapter {
    pub fn new() -> Self {
        Self
    }

    const BASE_URL: &'static str = "https://www.ndtv.com";
}

impl SourceAdapter for NdtvAdapter {
    fn source(&self) -> Source {
        Source::Ndtv
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
        "NDTV Staff"
    }

    /// Bylines embed the date in a longer string, so it is matched out first.
    fn parse_published_date(&self, raw: &str) -> DateTime<Utc> {
        let date = DATE_IN_BYLINE
            .find(raw)
            .and_then(|m| dates::parse_free_form(m.as_str()));
        dates::or_now(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use nd_core::{Error, ExtractionError};

    const LISTING_HTML: &str = r#"
        <div class="lisingNews">
            <div class="news_Itm">
                <div class="news_Itm-img"><a href="/india-news/story-one-123"><img src="//c.ndtvimg.com/one.jpg"></a></div>
                <h2 class="newsHdng"><a href="/india-news/story-one-123"> Story One </a></h2>
                <span class="posted-by">Updated: April 10, 2023 10:30 IST</span>
                <p class="newsCont"> First summary. </p>
            </div>
            <div class="news_Itm">
                <h2 class="newsHdng">No link here</h2>
            </div>
            <div class="news_Itm">
                <a href="https://www.ndtv.com/world-news/story-two-456"><img src="/images/two.jpg"></a>
                <h2 class="newsHdng">Story Two</h2>
                <span class="posted-by">yesterday</span>
            </div>
            <div class="news_Itm">
                <a href="/india-news/story-three-789"><img src="ftp://x/three.jpg"></a>
                <h2 class="newsHdng">Story Three</h2>
            </div>
        </div>
    "#;

    const ARTICLE_HTML: &str = r#"
        <div class="pst-by-txt">Reported by <a href="/author/r">Rhea Kapoor</a></div>
        <div class="story__content"><p>Paragraph one.</p><p>Paragraph two.</p></div>
        <div class="tg_wrp"><a>Cricket</a><a> IPL </a><a>Cricket</a></div>
    "#;

    #[test]
    fn test_list_candidates() {
        let adapter = NdtvAdapter::new();
        let candidates = adapter.list_candidates(LISTING_HTML, Category::Politics, 10).unwrap();
        assert_eq!(candidates.len(), 3);

        let first = &candidates[0];
        assert_eq!(first.title, "Story One");
        assert_eq!(first.summary, "First summary.");
        assert_eq!(first.url, "https://www.ndtv.com/india-news/story-one-123");
        assert_eq!(first.image_url, "https://c.ndtvimg.com/one.jpg");
        assert_eq!(first.source, Source::Ndtv);
        assert_eq!(first.category, Category::Politics);
        assert_eq!(
            (first.published_at.year(), first.published_at.month(), first.published_at.day()),
            (2023, 4, 10)
        );

        assert_eq!(candidates[1].url, "https://www.ndtv.com/world-news/story-two-456");
        assert_eq!(candidates[1].image_url, "https://www.ndtv.com/images/two.jpg");
        assert_eq!(candidates[1].summary, "");
        assert_eq!(candidates[2].image_url, "");
    }

    #[test]
    fn test_limit_counts_valid_candidates() {
        let adapter = NdtvAdapter::new();
        let candidates = adapter.list_candidates(LISTING_HTML, Category::World, 2).unwrap();
        let titles: Vec<_> = candidates.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Story One", "Story Two"]);

        assert!(adapter.list_candidates(LISTING_HTML, Category::World, 0).unwrap().is_empty());
    }

    #[test]
    fn test_extract_detail() {
        let detail = NdtvAdapter::new().extract_detail(ARTICLE_HTML).unwrap();
        assert_eq!(detail.content, "Paragraph one.Paragraph two.");
        assert_eq!(detail.author, "Rhea Kapoor");
        assert_eq!(detail.keywords, vec!["Cricket", "IPL"]);
    }

    #[test]
    fn test_extract_detail_defaults() {
        let detail = NdtvAdapter::new()
            .extract_detail(r#"<div class="story__content">Body</div>"#)
            .unwrap();
        assert_eq!(detail.author, "NDTV Staff");
        assert!(detail.keywords.is_empty());

        let err = NdtvAdapter::new().extract_detail("<html></html>").unwrap_err();
        assert!(matches!(
            err,
            Error::Extraction(ExtractionError::MissingRequiredField("content"))
        ));
    }

    #[test]
    fn test_parse_published_date() {
        let adapter = NdtvAdapter::new();
        let dt = adapter.parse_published_date("Updated: April 10, 2023 10:30 IST");
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 4, 10));

        let before = Utc::now();
        for raw in ["", "Updated: just now", "April 2023"] {
            let dt = adapter.parse_published_date(raw);
            assert!(dt >= before && dt <= Utc::now(), "{:?}", raw);
        }
    }

    #[test]
    fn test_normalize_category() {
        let adapter = NdtvAdapter::new();
        assert_eq!(adapter.normalize_category("gadgets"), Category::Tech);
        assert_eq!(adapter.normalize_category("World-News"), Category::World);
        assert_eq!(adapter.normalize_category("sport"), Category::World);
    }

    #[test]
    fn test_category_urls() {
        let adapter = NdtvAdapter::new();
        assert_eq!(
            adapter.resolve_category_url("Tech").unwrap().as_str(),
            "https://www.ndtv.com/gadgets/news"
        );
        assert_eq!(
            adapter.resolve_category_url("world").unwrap().as_str(),
            "https://www.ndtv.com/world-news"
        );
    }
}
