use async_trait::async_trait;
use chrono::Utc;
use nn_core::{Article, ArticleRepository, Error, ImageRef, ImageStore, NewArticle, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
pub struct MemoryStore {
    articles: Vec<Article>,
    next_id: i64,
}

impl MemoryStore {
    pub fn find_by_title(&self, title: &str) -> Option<Article> {
        self.articles.iter().find(|a| a.title == title).cloned()
    }

    pub fn save(&mut self, article: NewArticle) -> Result<Article> {
        if self.articles.iter().any(|a| a.title == article.title) {
            return Err(Error::DuplicateTitle(article.title));
        }
        self.next_id += 1;
        let stored = Article::from_new(self.next_id, article, Utc::now());
        self.articles.push(stored.clone());
        Ok(stored)
    }
}

/// Article repository kept in process memory. Titles are unique.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.articles.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn all(&self) -> Vec<Article> {
        self.store.read().await.articles.clone()
    }
}

#[async_trait]
impl ArticleRepository for InMemoryRepository {
    async fn find_by_title(&self, title: &str) -> Result<Option<Article>> {
        let store = self.store.read().await;
        Ok(store.find_by_title(title))
    }

    async fn save(&self, article: NewArticle) -> Result<Article> {
        let mut store = self.store.write().await;
        let stored = store.save(article)?;
        debug!(id = stored.id, title = %stored.title, "Stored article in memory");
        Ok(stored)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryImageStore {
    images: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, identifier: &str) -> Option<Vec<u8>> {
        self.images.read().await.get(identifier).cloned()
    }

    pub async fn len(&self) -> usize {
        self.images.read().await.len()
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn put(&self, identifier: &str, bytes: &[u8]) -> Result<ImageRef> {
        self.images
            .write()
            .await
            .insert(identifier.to_string(), bytes.to_vec());
        Ok(ImageRef {
            name: identifier.to_string(),
            path: format!("memory://{}", identifier),
        })
    }
}
