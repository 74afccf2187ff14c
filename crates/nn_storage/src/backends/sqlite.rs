use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nn_core::{Article, ArticleRepository, Error, ImageRef, NewArticle, Result, Source};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_DB_PATH: &str = "articles.db";

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL UNIQUE,
        summary TEXT NOT NULL,
        content TEXT NOT NULL,
        author TEXT NOT NULL,
        created TEXT NOT NULL,
        created_at TEXT NOT NULL,
        source TEXT NOT NULL,
        image TEXT
    )
    "#,
    // Add future migrations here
];

/// SQLite-backed repository. `UNIQUE(title)` closes the check-then-save race
/// between concurrent runs.
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::Storage(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self { pool })
    }

    fn row_to_article(row: &SqliteRow) -> Result<Article> {
        let source: String = row.get("source");
        let created_at: String = row.get("created_at");
        let image: Option<String> = row.get("image");

        Ok(Article {
            id: row.get("id"),
            title: row.get("title"),
            summary: row.get("summary"),
            content: row.get("content"),
            author: row.get("author"),
            created: row.get("created"),
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| Error::Storage(format!("Failed to parse date: {}", e)))?
                .with_timezone(&Utc),
            source: source.parse::<Source>()?,
            image: image
                .map(|json| serde_json::from_str::<ImageRef>(&json))
                .transpose()?,
        })
    }
}

#[async_trait]
impl ArticleRepository for SqliteRepository {
    async fn find_by_title(&self, title: &str) -> Result<Option<Article>> {
        let row = sqlx::query("SELECT * FROM articles WHERE title = ?")
            .bind(title)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("Failed to look up article: {}", e)))?;

        row.as_ref().map(Self::row_to_article).transpose()
    }

    async fn save(&self, article: NewArticle) -> Result<Article> {
        let created_at = Utc::now();
        let image = article
            .image
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let result = sqlx::query(
            r#"
            INSERT INTO articles
            (title, summary, content, author, created, created_at, source, image)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&article.title)
        .bind(&article.summary)
        .bind(&article.content)
        .bind(&article.author)
        .bind(&article.created)
        .bind(created_at.to_rfc3339())
        .bind(article.source.name())
        .bind(image)
        .execute(&self.pool)
        .await;

        let result = match result {
            Ok(result) => result,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(Error::DuplicateTitle(article.title));
            }
            Err(e) => return Err(Error::Storage(format!("Failed to store article: {}", e))),
        };

        let id = result.last_insert_rowid();
        debug!(id, title = %article.title, "Stored article in SQLite");
        Ok(Article::from_new(id, article, created_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn new_article(title: &str) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            summary: "Summary".to_string(),
            content: "P1\n\nP2".to_string(),
            author: "Reporter".to_string(),
            created: "२०८३ कात्तिक ३".to_string(),
            source: Source::NagarikNews,
            image: Some(ImageRef {
                name: "photo.jpg".to_string(),
                path: "media/posts_images/photo.jpg".to_string(),
            }),
        }
    }

    #[tokio::test]
    async fn test_sqlite_repository() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let repo = SqliteRepository::new_with_path(&db_path).await.unwrap();

        assert!(repo.find_by_title("Test Article").await.unwrap().is_none());
        let saved = repo.save(new_article("Test Article")).await.unwrap();

        let found = repo.find_by_title("Test Article").await.unwrap().unwrap();
        assert_eq!(found.id, saved.id);
        assert_eq!(found.source, Source::NagarikNews);
        assert_eq!(found.content, "P1\n\nP2");
        assert_eq!(found.image.unwrap().name, "photo.jpg");
    }

    #[tokio::test]
    async fn test_sqlite_unique_title() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let repo = SqliteRepository::new_with_path(&db_path).await.unwrap();

        repo.save(new_article("Same")).await.unwrap();
        let err = repo.save(new_article("Same")).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateTitle(_)));
    }
}
