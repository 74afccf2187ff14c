pub mod cli;
pub mod dedup;
pub mod fetcher;
pub mod image;
pub mod logging;
pub mod pipeline;
pub mod scrapers;

pub use cli::{handle_command, ScraperArgs, ScraperCommands};
pub use dedup::{Deduplicator, TitleLocks};
pub use fetcher::{FetchResponse, Fetcher, HttpTransport, RetryPolicy, Transport};
pub use image::{AcquiredImage, ImageAcquirer, ImageNaming};
pub use pipeline::{Pipeline, PipelineConfig};
pub use scrapers::{Adapter, SourceAdapter};
