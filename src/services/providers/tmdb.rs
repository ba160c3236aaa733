/// TMDb API provider
///
/// API Flow:
/// 1. Title Search: /search/movie → TMDb ID + canonical title
/// 2. Details: /movie/{id} → genre ids
/// 3. Reviews: /movie/{id}/reviews → review bodies (first page)
/// 4. Discover: /discover/movie → vote-sorted movies sharing the target's genres
use chrono::NaiveDate;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::{
    config::{Config, GenreMatch},
    error::{AppError, AppResult},
    models::{ApiMovie, ApiMovieDetails, ApiPage, ApiReview, GenreId, MovieId, MovieRef},
    services::providers::CatalogProvider,
};

const DISCOVER_SORT: &str = "vote_average.desc";

/// Filters applied to every discovery request
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverFilters {
    pub release_date_cutoff: NaiveDate,
    pub min_vote_count: u32,
    pub original_language: String,
    pub genre_match: GenreMatch,
}

impl From<&Config> for DiscoverFilters {
    fn from(config: &Config) -> Self {
        Self {
            release_date_cutoff: config.release_date_cutoff,
            min_vote_count: config.min_vote_count,
            original_language: config.original_language.clone(),
            genre_match: config.genre_match,
        }
    }
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
    filters: DiscoverFilters,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, language: String, filters: DiscoverFilters) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            filters,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_language.clone(),
            DiscoverFilters::from(config),
        )
    }

    /// Issues a GET against the API and decodes the JSON body
    ///
    /// The API key and language are appended to `params`. Any non-success status is an
    /// error, so an invalid key surfaces the same way as an unreachable host.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(params)
            .query(&[
                ("language", self.language.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDb API returned status {} for {}: {}",
                status, path, body
            )));
        }

        Ok(response.json().await?)
    }

    /// Query parameters for one discovery page, excluding key and language
    fn discover_params(&self, genre_ids: &[GenreId], page: u32) -> Vec<(&'static str, String)> {
        let with_genres = genre_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(self.filters.genre_match.separator());

        vec![
            ("with_genres", with_genres),
            (
                "primary_release_date.lte",
                self.filters.release_date_cutoff.format("%Y-%m-%d").to_string(),
            ),
            ("sort_by", DISCOVER_SORT.to_string()),
            ("vote_count.gte", self.filters.min_vote_count.to_string()),
            (
                "with_original_language",
                self.filters.original_language.clone(),
            ),
            ("page", page.to_string()),
        ]
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn search_movies(&self, query: &str) -> AppResult<Vec<MovieRef>> {
        let page: ApiPage<ApiMovie> = self
            .get_json(
                "/search/movie",
                &[
                    ("query", query.to_string()),
                    ("include_adult", "false".to_string()),
                    ("page", "1".to_string()),
                ],
            )
            .await?;

        let movies: Vec<MovieRef> = page.results.into_iter().map(MovieRef::from).collect();

        tracing::info!(
            query = %query,
            results = movies.len(),
            provider = "tmdb",
            "Movie search completed"
        );

        Ok(movies)
    }

    async fn movie_genres(&self, movie_id: MovieId) -> AppResult<Vec<GenreId>> {
        let details: ApiMovieDetails = self
            .get_json(&format!("/movie/{}", movie_id), &[])
            .await?;

        let genres: Vec<GenreId> = details.genres.iter().map(|g| g.id).collect();

        tracing::debug!(movie_id, genres = ?genres, provider = "tmdb", "Genres fetched");

        Ok(genres)
    }

    async fn movie_reviews(&self, movie_id: MovieId) -> AppResult<Vec<String>> {
        let page: ApiPage<ApiReview> = self
            .get_json(
                &format!("/movie/{}/reviews", movie_id),
                &[("page", "1".to_string())],
            )
            .await?;

        let reviews: Vec<String> = page
            .results
            .into_iter()
            .map(|review| {
                tracing::trace!(movie_id, author = %review.author, "Review received");
                review.content
            })
            .collect();

        tracing::debug!(
            movie_id,
            reviews = reviews.len(),
            provider = "tmdb",
            "Reviews fetched"
        );

        Ok(reviews)
    }

    async fn discover_movies(&self, genre_ids: &[GenreId], page: u32) -> AppResult<Vec<MovieRef>> {
        let params = self.discover_params(genre_ids, page);
        let listing: ApiPage<ApiMovie> = self.get_json("/discover/movie", &params).await?;

        let movies: Vec<MovieRef> = listing.results.into_iter().map(MovieRef::from).collect();

        tracing::info!(
            page,
            results = movies.len(),
            provider = "tmdb",
            "Discover page fetched"
        );

        Ok(movies)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
