use clap::{Args, Subcommand};
use nn_core::{Result, RunReport, Source};
use tracing::error;

use crate::pipeline::Pipeline;
use crate::scrapers::nepal::get_adapters;
use crate::scrapers::SourceAdapter;

#[derive(Args, Debug, Clone)]
pub struct ScraperArgs {
    #[command(subcommand)]
    pub command: ScraperCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScraperCommands {
    /// Ingest articles from one source, or from all of them
    Scrape {
        /// ekantipur, onlinekhabar, nagarik (or nepal/<name>). Omit to scrape every source.
        source: Option<String>,
    },
    /// List available sources
    List,
}

pub async fn handle_command(args: ScraperArgs, pipeline: &Pipeline) -> Result<Vec<RunReport>> {
    match args.command {
        ScraperCommands::Scrape { source: Some(source) } => {
            let source: Source = source.parse()?;
            let report = pipeline.run_source(source).await?;
            println!("{}", report);
            Ok(vec![report])
        }
        ScraperCommands::Scrape { source: None } => {
            let mut reports = Vec::new();
            let mut first_error = None;
            for (source, result) in pipeline.run_all().await {
                match result {
                    Ok(report) => {
                        println!("{}", report);
                        reports.push(report);
                    }
                    Err(e) => {
                        error!(%source, error = %e, "Source run failed");
                        first_error.get_or_insert(e);
                    }
                }
            }
            match first_error {
                Some(e) => Err(e),
                None => Ok(reports),
            }
        }
        ScraperCommands::List => {
            list_sources();
            Ok(Vec::new())
        }
    }
}

/// Print every supported source. Needs no storage or network.
pub fn list_sources() {
    println!("Available sources:");
    for adapter in get_adapters() {
        let meta = adapter.source_metadata();
        println!(
            "  {}/{:<14} {} {} ({})",
            meta.region.name,
            adapter.source().cli_name(),
            meta.emoji,
            meta.name,
            meta.homepage
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ScraperArgs,
    }

    #[test]
    fn test_parse_scrape_source() {
        let cli = TestCli::parse_from(["nn", "scrape", "nepal/ekantipur"]);
        match cli.args.command {
            ScraperCommands::Scrape { source } => assert_eq!(source.as_deref(), Some("nepal/ekantipur")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_scrape_all() {
        let cli = TestCli::parse_from(["nn", "scrape"]);
        assert!(matches!(cli.args.command, ScraperCommands::Scrape { source: None }));
    }

    #[test]
    fn test_parse_list() {
        let cli = TestCli::parse_from(["nn", "list"]);
        assert!(matches!(cli.args.command, ScraperCommands::List));
    }
}
