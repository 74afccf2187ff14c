use async_trait::async_trait;
use nn_core::{Error, ImageRef, ImageStore, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_MEDIA_DIR: &str = "media/posts_images";

/// Writes images as plain files under a media directory.
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn put(&self, identifier: &str, bytes: &[u8]) -> Result<ImageRef> {
        // identifiers come from remote URLs
        if identifier.is_empty()
            || identifier.contains(['/', '\\'])
            || identifier == "."
            || identifier == ".."
        {
            return Err(Error::Storage(format!(
                "Refusing to store image under {:?}",
                identifier
            )));
        }

        let path = self.root.join(identifier);
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "Wrote image");

        Ok(ImageRef {
            name: identifier.to_string(),
            path: path.display().to_string(),
        })
    }
}
