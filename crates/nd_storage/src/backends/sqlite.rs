use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nd_core::{Article, ArticleStorage, Category, Error, Result, Source, StorageError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use crate::StorageBackend;

const DEFAULT_DB_PATH: &str = "articles.db";

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        url TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        summary TEXT NOT NULL,
        content TEXT NOT NULL,
        image_url TEXT NOT NULL DEFAULT '',
        source TEXT NOT NULL,
        category TEXT NOT NULL,
        author TEXT NOT NULL,
        published_at TEXT NOT NULL,
        scraped_at TEXT NOT NULL,
        keywords TEXT NOT NULL DEFAULT '[]'
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_articles_source_category ON articles (source, category)",
];

pub struct SQLiteStorage {
    pool: SqlitePool,
    db_path: PathBuf,
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| backend("Failed to connect to database", e))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| backend(&format!("Failed to run migration {}", i), e))?;
        }

        Ok(Self {
            pool,
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    pub async fn get(&self, url: &str) -> Result<Option<Article>> {
        let row = sqlx::query("SELECT * FROM articles WHERE url = ?")
            .bind(url)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| backend("Failed to load article", e))?;

        row.map(|row| article_from_row(&row)).transpose()
    }
}

#[async_trait]
impl StorageBackend for SQLiteStorage {
    const KIND: &'static str = "sqlite";

    fn get_error_message() -> &'static str {
        "SQLite database should be writable (default ./articles.db)"
    }

    async fn open(location: Option<&str>) -> Result<Self> {
        Self::new_with_path(Path::new(location.unwrap_or(DEFAULT_DB_PATH))).await
    }
}

#[async_trait]
impl ArticleStorage for SQLiteStorage {
    async fn exists_by_url(&self, url: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM articles WHERE url = ? LIMIT 1")
            .bind(url)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| backend("Failed to look up article", e))?;
        Ok(row.is_some())
    }

    async fn insert(&self, article: &Article) -> Result<()> {
        let keywords = serde_json::to_string(&article.keywords)?;

        sqlx::query(
            r#"
            INSERT INTO articles
            (url, title, summary, content, image_url, source, category, author, published_at, scraped_at, keywords)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&article.url)
        .bind(&article.title)
        .bind(&article.summary)
        .bind(&article.content)
        .bind(&article.image_url)
        .bind(article.source.name())
        .bind(article.category.name())
        .bind(&article.author)
        .bind(article.published_at.to_rfc3339())
        .bind(article.scraped_at.to_rfc3339())
        .bind(keywords)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
                Error::Storage(StorageError::DuplicateKey(article.url.clone()))
            } else {
                backend("Failed to store article", e)
            }
        })?;

        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| backend("Failed to count articles", e))?;
        Ok(count as usize)
    }
}

fn backend(context: &str, e: sqlx::Error) -> Error {
    StorageError::Backend(format!("{}: {}", context, e)).into()
}

fn article_from_row(row: &SqliteRow) -> Result<Article> {
    let source: Source = serde_json::from_value(serde_json::Value::String(row.get("source")))?;
    let category: Category = serde_json::from_value(serde_json::Value::String(row.get("category")))?;
    let keywords: Vec<String> = serde_json::from_str(&row.get::<String, _>("keywords"))?;

    Ok(Article {
        title: row.get("title"),
        summary: row.get("summary"),
        content: row.get("content"),
        url: row.get("url"),
        image_url: row.get("image_url"),
        source,
        category,
        author: row.get("author"),
        published_at: parse_timestamp(&row.get::<String, _>("published_at"))?,
        scraped_at: parse_timestamp(&row.get::<String, _>("scraped_at"))?,
        keywords,
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Backend(format!("Failed to parse date {:?}: {}", raw, e)).into())
}
