use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use review_vibes::{
    config::Config,
    services::{providers::TmdbProvider, Recommender, RecommenderSettings, Reporter},
};

/// Find movies whose reviews read like the reviews of a given movie
#[derive(Parser)]
#[command(name = "review-vibes")]
#[command(about = "Find movies with a similar review vibe", long_about = None)]
struct Cli {
    /// Movie title to search for
    title: String,

    /// How many matches to show
    #[arg(long, default_value = "25")]
    top: usize,

    /// Discovery pages to scan for candidates (defaults to DISCOVER_PAGES)
    #[arg(long)]
    pages: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    review_vibes::init_tracing("warn");

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let mut settings = RecommenderSettings::from(&config);
    if let Some(pages) = cli.pages {
        settings.discover_pages = pages;
    }

    let provider = Arc::new(TmdbProvider::from_config(&config));
    let recommender = Recommender::new(provider, settings);

    let mut reporter = Reporter::new(std::io::stdout().lock());
    recommender
        .recommend(&cli.title, cli.top, &mut reporter)
        .await
        .with_context(|| format!("Recommendation run for '{}' failed", cli.title))?;

    Ok(())
}
