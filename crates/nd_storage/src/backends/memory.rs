use std::collections::HashMap;

use async_trait::async_trait;
use nd_core::{Article, ArticleStorage, Result, StorageError};
use tokio::sync::RwLock;

use crate::StorageBackend;

#[derive(Default)]
struct MemoryStore {
    index: HashMap<String, usize>,
    articles: Vec<Article>,
}

/// Process-local store keyed by url, in insertion order.
#[derive(Default)]
pub struct InMemoryStorage {
    store: RwLock<MemoryStore>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, url: &str) -> Option<Article> {
        let store = self.store.read().await;
        store.index.get(url).map(|&i| store.articles[i].clone())
    }

    /// All stored articles, oldest insert first.
    pub async fn articles(&self) -> Vec<Article> {
        self.store.read().await.articles.clone()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    const KIND: &'static str = "memory";

    fn get_error_message() -> &'static str {
        "Memory storage should always be available"
    }

    async fn open(_location: Option<&str>) -> Result<Self> {
        Ok(Self::new())
    }
}

#[async_trait]
impl ArticleStorage for InMemoryStorage {
    async fn exists_by_url(&self, url: &str) -> Result<bool> {
        Ok(self.store.read().await.index.contains_key(url))
    }

    async fn insert(&self, article: &Article) -> Result<()> {
        // Check and insert under one write lock so concurrent inserts of the
        // same url cannot both succeed.
        let mut store = self.store.write().await;
        if store.index.contains_key(&article.url) {
            return Err(StorageError::DuplicateKey(article.url.clone()).into());
        }
        let position = store.articles.len();
        store.index.insert(article.url.clone(), position);
        store.articles.push(article.clone());
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.store.read().await.articles.len())
    }
}
