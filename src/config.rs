use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

/// How the target's genre ids are combined in the discovery filter
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenreMatch {
    /// Movies sharing at least one genre with the target
    #[default]
    Any,
    /// Movies carrying every genre of the target
    All,
}

impl GenreMatch {
    /// Separator TMDb interprets for `with_genres`: `|` is OR, `,` is AND
    pub fn separator(&self) -> &'static str {
        match self {
            GenreMatch::Any => "|",
            GenreMatch::All => ",",
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDb API key, sent as the `api_key` query parameter
    #[serde(default)]
    pub tmdb_api_key: String,

    /// TMDb API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Response language requested from every endpoint
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Number of discovery pages fetched per run
    #[serde(default = "default_discover_pages")]
    pub discover_pages: u32,

    /// Latest primary release date considered for candidates
    #[serde(default = "default_release_date_cutoff")]
    pub release_date_cutoff: NaiveDate,

    /// Minimum vote count for candidates
    #[serde(default = "default_min_vote_count")]
    pub min_vote_count: u32,

    /// Original language filter for candidates
    #[serde(default = "default_original_language")]
    pub original_language: String,

    #[serde(default)]
    pub genre_match: GenreMatch,

    /// Maximum number of candidate review fetches in flight
    #[serde(default = "default_review_concurrency")]
    pub review_concurrency: usize,

    /// Web front end host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Web front end port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Program the web front end runs for each request
    #[serde(default)]
    pub cli_path: Option<PathBuf>,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_discover_pages() -> u32 {
    3
}

fn default_release_date_cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default()
}

fn default_min_vote_count() -> u32 {
    50
}

fn default_original_language() -> String {
    "en".to_string()
}

fn default_review_concurrency() -> usize {
    8
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.tmdb_api_key.trim().is_empty() {
            tracing::warn!("TMDB_API_KEY is not set; catalog requests will be rejected");
        }

        Ok(config)
    }
}
