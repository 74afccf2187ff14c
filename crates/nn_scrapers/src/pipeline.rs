use futures::future::join_all;
use futures::stream::{self, StreamExt};
use nn_core::{
    ArticleCandidate, ArticleRepository, Error, ImageRef, ImageStore, NewArticle, Result,
    RunReport, Source,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::dedup::{Deduplicator, TitleLocks};
use crate::fetcher::{Fetcher, RetryPolicy};
use crate::image::ImageAcquirer;
use crate::scrapers::{Adapter, SourceAdapter};

pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub retry: RetryPolicy,
    /// Candidates processed at once within one source.
    pub concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Persisted,
    Duplicate,
    Skipped,
}

/// Drives one source from homepage to stored articles.
pub struct Pipeline {
    fetcher: Fetcher,
    images: ImageAcquirer,
    dedup: Deduplicator,
    repository: Arc<dyn ArticleRepository>,
    image_store: Arc<dyn ImageStore>,
    locks: TitleLocks,
    concurrency: usize,
}

impl Pipeline {
    pub fn new(
        fetcher: Fetcher,
        repository: Arc<dyn ArticleRepository>,
        image_store: Arc<dyn ImageStore>,
        concurrency: usize,
    ) -> Self {
        Self {
            images: ImageAcquirer::new(fetcher.clone()),
            dedup: Deduplicator::new(repository.clone()),
            fetcher,
            repository,
            image_store,
            locks: TitleLocks::new(),
            concurrency: concurrency.max(1),
        }
    }

    /// Share title locks with other pipelines writing to the same store.
    pub fn with_title_locks(mut self, locks: TitleLocks) -> Self {
        self.locks = locks;
        self
    }

    /// Run one source end-to-end. Per-candidate problems are counted and
    /// logged; storage failures and cancellation abort the run.
    #[instrument(level = "info", skip(self), fields(source = %source))]
    pub async fn run_source(&self, source: Source) -> Result<RunReport> {
        let adapter = Adapter::for_source(source);
        let homepage = adapter.homepage();

        info!(%homepage, "Fetching homepage");
        let html = self.fetcher.fetch_text(homepage).await?;
        let candidates = adapter.extract_list(&html);
        info!(count = candidates.len(), "Extracted candidates");

        let mut report = RunReport::new(source);
        report.attempted = candidates.len();

        let mut outcomes = stream::iter(candidates)
            .map(|candidate| self.process_candidate(&adapter, candidate))
            .buffer_unordered(self.concurrency);

        while let Some(outcome) = outcomes.next().await {
            match outcome? {
                Outcome::Persisted => report.persisted += 1,
                Outcome::Duplicate => report.duplicate += 1,
                Outcome::Skipped => report.skipped += 1,
            }
        }

        info!(
            attempted = report.attempted,
            persisted = report.persisted,
            skipped = report.skipped,
            duplicate = report.duplicate,
            "Source run complete"
        );
        Ok(report)
    }

    /// Run every source concurrently; one result per source.
    pub async fn run_all(&self) -> Vec<(Source, Result<RunReport>)> {
        let runs = Source::ALL.map(|source| async move { (source, self.run_source(source).await) });
        join_all(runs).await
    }

    #[instrument(level = "debug", skip_all, fields(title = %candidate.title))]
    async fn process_candidate(&self, adapter: &Adapter, candidate: ArticleCandidate) -> Result<Outcome> {
        let _title_guard = self.locks.lock(&candidate.title).await;

        if self.dedup.exists(&candidate.title).await? {
            debug!("Already stored, skipping");
            return Ok(Outcome::Duplicate);
        }

        let html = match self.fetcher.fetch_text(&candidate.detail_url).await {
            Ok(html) => html,
            Err(e @ Error::RetriesExhausted { .. }) => {
                warn!(url = %candidate.detail_url, error = %e, "Detail page unreachable, skipping");
                return Ok(Outcome::Skipped);
            }
            Err(e) => return Err(e),
        };

        let detail = match adapter.extract_detail(&html) {
            Ok(detail) => detail,
            Err(e) if e.is_candidate_local() => {
                warn!(url = %candidate.detail_url, error = %e, "Could not parse detail page, skipping");
                return Ok(Outcome::Skipped);
            }
            Err(e) => return Err(e),
        };

        let image = match detail.image_url.as_deref() {
            Some(image_url) => match self.store_image(adapter, image_url).await? {
                Some(image) => Some(image),
                None => {
                    warn!(url = %candidate.detail_url, %image_url, "Lead image unavailable, skipping");
                    return Ok(Outcome::Skipped);
                }
            },
            None => None,
        };

        let article = NewArticle::assemble(adapter.source(), &candidate, &detail, image);
        match self.repository.save(article).await {
            Ok(saved) => {
                info!(id = saved.id, "Stored article");
                Ok(Outcome::Persisted)
            }
            Err(Error::DuplicateTitle(_)) => {
                debug!("Stored concurrently by another run");
                Ok(Outcome::Duplicate)
            }
            Err(e) => Err(e),
        }
    }

    async fn store_image(&self, adapter: &Adapter, image_url: &str) -> Result<Option<ImageRef>> {
        let Some(image) = self.images.acquire(image_url, &adapter.image_naming()).await? else {
            return Ok(None);
        };
        let stored = self.image_store.put(&image.identifier, &image.bytes).await?;
        Ok(Some(stored))
    }
}
