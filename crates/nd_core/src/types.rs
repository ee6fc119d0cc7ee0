use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored summaries never exceed this many characters.
pub const MAX_SUMMARY_CHARS: usize = 500;

/// Author recorded when nothing better is known.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// News outlets the pipeline knows how to ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "WION")]
    Wion,
    #[serde(rename = "Firstpost")]
    Firstpost,
    #[serde(rename = "NDTV")]
    Ndtv,
    #[serde(rename = "The Wire")]
    TheWire,
}

impl Source {
    pub const ALL: [Source; 4] = [Source::Wion, Source::Firstpost, Source::Ndtv, Source::TheWire];

    /// Registry key used by the HTTP trigger and the CLI.
    pub fn key(&self) -> &'static str {
        match self {
            Source::Wion => "wion",
            Source::Firstpost => "firstpost",
            Source::Ndtv => "ndtv",
            Source::TheWire => "thewire",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Source::Wion => "WION",
            Source::Firstpost => "Firstpost",
            Source::Ndtv => "NDTV",
            Source::TheWire => "The Wire",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The closed set of categories every source vocabulary is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    Tech,
    Politics,
    Sports,
    Business,
    Entertainment,
    Health,
    Science,
    #[default]
    World,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Tech,
        Category::Politics,
        Category::Sports,
        Category::Business,
        Category::Entertainment,
        Category::Health,
        Category::Science,
        Category::World,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Tech => "Tech",
            Category::Politics => "Politics",
            Category::Sports => "Sports",
            Category::Business => "Business",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Science => "Science",
            Category::World => "World",
        }
    }

    /// Lowercase logical name, as requested by callers and used in category tables.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Tech => "tech",
            Category::Politics => "politics",
            Category::Sports => "sports",
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::Health => "health",
            Category::Science => "science",
            Category::World => "world",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An article as seen on a listing page, before its own page is fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub image_url: String,
    pub source: Source,
    pub category: Category,
    pub published_at: DateTime<Utc>,
    pub scraped_at: DateTime<Utc>,
}

impl Candidate {
    /// Builds a candidate, trimming text fields and stamping `scraped_at`.
    pub fn new(
        source: Source,
        category: Category,
        title: &str,
        summary: &str,
        url: String,
        image_url: String,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.trim().to_string(),
            summary: truncate_chars(summary.trim(), MAX_SUMMARY_CHARS),
            url,
            image_url,
            source,
            category,
            published_at,
            scraped_at: Utc::now(),
        }
    }
}

/// Fields only available from the article's own page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDetail {
    pub content: String,
    pub author: String,
    pub keywords: Vec<String>,
}

/// A complete record, the unit of storage and of deduplication (by `url`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub url: String,
    #[serde(default)]
    pub image_url: String,
    pub source: Source,
    pub category: Category,
    #[serde(default = "unknown_author")]
    pub author: String,
    pub published_at: DateTime<Utc>,
    pub scraped_at: DateTime<Utc>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

fn unknown_author() -> String {
    UNKNOWN_AUTHOR.to_string()
}

impl Article {
    pub fn from_parts(candidate: Candidate, detail: ArticleDetail) -> Self {
        let author = match detail.author.trim() {
            "" => unknown_author(),
            author => author.to_string(),
        };
        Self {
            title: candidate.title,
            summary: candidate.summary,
            content: detail.content,
            url: candidate.url,
            image_url: candidate.image_url,
            source: candidate.source,
            category: candidate.category,
            author,
            published_at: candidate.published_at,
            scraped_at: candidate.scraped_at,
            keywords: detail.keywords,
        }
    }
}

/// What happened to a single candidate during a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOutcome {
    Saved,
    /// Already stored, either found up front or rejected by the unique key.
    Duplicate,
    Failed,
}

/// Result of one scraping job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionReport {
    pub source: Source,
    pub category: Category,
    pub saved_count: usize,
    pub skipped_count: usize,
    pub failed_count: usize,
    pub cancelled_count: usize,
    pub articles: Vec<Candidate>,
}

impl IngestionReport {
    pub fn new(source: Source, category: Category, articles: Vec<Candidate>) -> Self {
        Self {
            source,
            category,
            saved_count: 0,
            skipped_count: 0,
            failed_count: 0,
            cancelled_count: 0,
            articles,
        }
    }

    pub fn record(&mut self, outcome: CandidateOutcome) {
        match outcome {
            CandidateOutcome::Saved => self.saved_count += 1,
            CandidateOutcome::Duplicate => self.skipped_count += 1,
            CandidateOutcome::Failed => self.failed_count += 1,
        }
    }

    pub fn processed_count(&self) -> usize {
        self.saved_count + self.skipped_count + self.failed_count
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text.to_string(),
    }
}
