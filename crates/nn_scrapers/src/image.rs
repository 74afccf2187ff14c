use nn_core::{Error, Result};
use tracing::{debug, warn};
use url::Url;

use crate::fetcher::Fetcher;

/// Where a site keeps the unique file name in its image URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageNaming {
    /// Zero-based index into the URL's path segments.
    pub segment: usize,
    /// Replace the segment's extension with this one.
    pub extension: Option<&'static str>,
}

impl ImageNaming {
    pub const fn verbatim(segment: usize) -> Self {
        Self {
            segment,
            extension: None,
        }
    }

    pub const fn with_extension(segment: usize, extension: &'static str) -> Self {
        Self {
            segment,
            extension: Some(extension),
        }
    }

    /// Stable file name for an image URL. Falls back to the last path
    /// segment when the URL is shorter than the site convention.
    pub fn identifier(&self, image_url: &str) -> Option<String> {
        let url = Url::parse(image_url).ok()?;
        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        let segment = segments
            .get(self.segment)
            .or_else(|| segments.last())
            .copied()?;

        match self.extension {
            Some(extension) => {
                let stem = segment
                    .rsplit_once('.')
                    .map_or(segment, |(stem, _)| stem);
                if stem.is_empty() {
                    return None;
                }
                Some(format!("{}.{}", stem, extension))
            }
            None => Some(segment.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredImage {
    pub identifier: String,
    pub bytes: Vec<u8>,
}

/// Downloads lead images. A dead image link means "skip this article",
/// not "try again later".
#[derive(Clone)]
pub struct ImageAcquirer {
    fetcher: Fetcher,
}

impl ImageAcquirer {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    pub async fn acquire(&self, image_url: &str, naming: &ImageNaming) -> Result<Option<AcquiredImage>> {
        let Some(identifier) = naming.identifier(image_url) else {
            warn!(%image_url, "Could not derive an image identifier");
            return Ok(None);
        };

        let response = match self.fetcher.get_once(image_url).await {
            Ok(response) => response,
            Err(Error::Cancelled) => return Err(Error::Cancelled),
            Err(e) => {
                warn!(%image_url, error = %e, "Image download failed");
                return Ok(None);
            }
        };

        if !response.is_success() {
            warn!(%image_url, status = response.status, "Image returned non-success status");
            return Ok(None);
        }

        debug!(%image_url, %identifier, bytes = response.body.len(), "Downloaded image");
        Ok(Some(AcquiredImage {
            identifier,
            bytes: response.body,
        }))
    }
}
