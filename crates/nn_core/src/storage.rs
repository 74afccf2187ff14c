use async_trait::async_trait;
use crate::types::{Article, ImageRef, NewArticle};
use crate::Result;

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Look up an article by its exact title
    async fn find_by_title(&self, title: &str) -> Result<Option<Article>>;

    /// Persist a new article. Backends that enforce title uniqueness return
    /// `Error::DuplicateTitle` when the title is already taken.
    async fn save(&self, article: NewArticle) -> Result<Article>;
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store image bytes under `identifier`, replacing any previous image
    async fn put(&self, identifier: &str, bytes: &[u8]) -> Result<ImageRef>;
}
