use clap::Parser;
use nn_scrapers::cli::list_sources;
use nn_scrapers::logging::init_logging;
use nn_scrapers::pipeline::DEFAULT_CONCURRENCY;
use nn_scrapers::{
    handle_command, Fetcher, Pipeline, PipelineConfig, RetryPolicy, ScraperArgs, ScraperCommands,
};
use nn_storage::fs::DEFAULT_MEDIA_DIR;
use nn_storage::{create_repository, FsImageStore, StorageKind};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Durations like `15s`, `2m`, `1h30m`. A bare number is seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut seen_number = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
                continue;
            }
            if c.is_whitespace() {
                continue;
            }
            let num: u64 = current_number
                .parse()
                .map_err(|_| format!("Invalid character in duration: {}", c))?;
            let unit = match c {
                's' => 1,
                'm' => 60,
                'h' => 3600,
                'd' => 86400,
                _ => return Err(format!("Invalid duration unit: {}", c)),
            };
            total_seconds = num
                .checked_mul(unit)
                .and_then(|seconds| total_seconds.checked_add(seconds))
                .ok_or_else(|| format!("Duration too large: {}", s))?;
            current_number.clear();
            seen_number = true;
        }

        if !current_number.is_empty() {
            let num = current_number
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total_seconds = total_seconds
                .checked_add(num)
                .ok_or_else(|| format!("Duration too large: {}", s))?;
            seen_number = true;
        }

        if !seen_number {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Ingest Nepali news sites into a local article store", long_about = None)]
struct Cli {
    /// Article repository backend: sqlite, or memory for a throwaway run
    #[arg(long, env = "NN_STORAGE", default_value = "sqlite")]
    storage: StorageKind,
    /// SQLite database file (sqlite backend only, default articles.db)
    #[arg(long, env = "NN_DATABASE")]
    database: Option<PathBuf>,
    /// Directory lead images are written to
    #[arg(long, env = "NN_MEDIA_DIR", default_value = DEFAULT_MEDIA_DIR)]
    media_dir: PathBuf,
    /// Wait between fetch attempts (e.g. 15s, 1m)
    #[arg(long, default_value = "15s")]
    retry_delay: HumanDuration,
    /// Give up on a page after this many attempts. Unlimited if omitted.
    #[arg(long)]
    max_attempts: Option<u32>,
    /// Per-request timeout
    #[arg(long, default_value = "30s")]
    request_timeout: HumanDuration,
    /// Candidates processed at once per source
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,
    /// Cancel everything still running after this long
    #[arg(long)]
    timeout: Option<HumanDuration>,
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
    #[command(flatten)]
    scraper: ScraperArgs,
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            retry: RetryPolicy {
                delay: self.retry_delay.0,
                max_attempts: self.max_attempts,
                request_timeout: self.request_timeout.0,
            },
            concurrency: self.concurrency,
        }
    }
}

/// Cancel `cancel` on Ctrl-C or once `deadline` has passed.
fn spawn_shutdown(cancel: CancellationToken, deadline: Option<Duration>) {
    tokio::spawn(async move {
        let deadline = async {
            match deadline {
                Some(deadline) => tokio::time::sleep(deadline).await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => warn!("🛑 Interrupted, cancelling in-flight work"),
            _ = deadline => warn!("⏰ Deadline reached, cancelling in-flight work"),
            _ = cancel.cancelled() => return,
        }
        cancel.cancel();
    });
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let ScraperCommands::List = cli.scraper.command {
        list_sources();
        return Ok(());
    }

    let config = cli.pipeline_config();
    let cancel = CancellationToken::new();
    spawn_shutdown(cancel.clone(), cli.timeout.map(|t| t.0));

    let repository = create_repository(cli.storage, cli.database.as_deref()).await?;
    let image_store = Arc::new(FsImageStore::new(cli.media_dir.clone()).await?);
    info!(storage = ?cli.storage, media_dir = %cli.media_dir.display(), "💾 Storage initialized");

    let fetcher = Fetcher::http(config.retry, cancel.clone())?;
    let pipeline = Pipeline::new(fetcher, repository, image_store, config.concurrency);

    let result = handle_command(cli.scraper, &pipeline).await;
    cancel.cancel();
    result?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli).await
}
