pub mod error;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use storage::{ArticleRepository, ImageStore};
pub use types::{
    Article, ArticleCandidate, ArticleDetail, ImageRef, NewArticle, Region, RunReport, Source,
    SourceMetadata,
};
