/// Movie catalog provider abstraction
///
/// The recommendation pipeline only talks to the catalog through this trait, so it can
/// run against TMDb in production and against mocks in tests.
use crate::{
    error::AppResult,
    models::{GenreId, MovieId, MovieRef},
};

pub mod tmdb;

pub use tmdb::{DiscoverFilters, TmdbProvider};

/// Trait for movie catalog providers
///
/// Every method is a single read-only request. Empty listings are normal results;
/// only transport failures and non-success statuses are errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Search movies by free-text title, first page only, in the provider's relevance order
    async fn search_movies(&self, query: &str) -> AppResult<Vec<MovieRef>>;

    /// Genre ids attached to a movie, in response order
    async fn movie_genres(&self, movie_id: MovieId) -> AppResult<Vec<GenreId>>;

    /// Review bodies from the first page of a movie's reviews
    async fn movie_reviews(&self, movie_id: MovieId) -> AppResult<Vec<String>>;

    /// One page of movies matching the given genres, sorted by average vote
    async fn discover_movies(&self, genre_ids: &[GenreId], page: u32) -> AppResult<Vec<MovieRef>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
