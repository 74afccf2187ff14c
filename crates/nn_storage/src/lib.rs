use nn_core::{ArticleRepository, Error, Result};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

pub mod backends;

pub use backends::*;

/// Which repository backend to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    Sqlite,
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(Error::Storage(format!("Unknown storage backend: {}", other))),
        }
    }
}

pub async fn create_repository(
    kind: StorageKind,
    database: Option<&Path>,
) -> Result<Arc<dyn ArticleRepository>> {
    match kind {
        StorageKind::Memory => Ok(Arc::new(InMemoryRepository::new())),
        #[cfg(feature = "sqlite")]
        StorageKind::Sqlite => {
            let path = database.unwrap_or_else(|| Path::new(sqlite::DEFAULT_DB_PATH));
            Ok(Arc::new(SqliteRepository::new_with_path(path).await?))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageKind::Sqlite => {
            let _ = database;
            Err(Error::Storage(
                "SQLite support was not compiled in (enable the `sqlite` feature)".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_kind_from_str() {
        assert_eq!("memory".parse::<StorageKind>().unwrap(), StorageKind::Memory);
        assert_eq!("SQLite".parse::<StorageKind>().unwrap(), StorageKind::Sqlite);
        assert!("qdrant".parse::<StorageKind>().is_err());
    }

    #[tokio::test]
    async fn test_create_memory_repository() {
        let repo = create_repository(StorageKind::Memory, None).await.unwrap();
        assert!(repo.find_by_title("anything").await.unwrap().is_none());
    }
}
