//! Per-movie attribute lookups: genre ids and review text.
//!
//! An empty result is a normal outcome. Callers decide whether it ends the run.

use crate::{
    error::AppResult,
    models::{GenreId, MovieId},
    services::providers::CatalogProvider,
};

/// Genre ids of a movie, in catalog order
pub async fn genres(provider: &dyn CatalogProvider, movie_id: MovieId) -> AppResult<Vec<GenreId>> {
    let genre_ids = provider.movie_genres(movie_id).await?;
    if genre_ids.is_empty() {
        tracing::debug!(movie_id, "Movie has no genres");
    }
    Ok(genre_ids)
}

/// Review bodies of a movie, first page only
///
/// Blank bodies are kept; they count as reviews and add nothing to the document.
pub async fn reviews(provider: &dyn CatalogProvider, movie_id: MovieId) -> AppResult<Vec<String>> {
    let reviews = provider.movie_reviews(movie_id).await?;

    if reviews.is_empty() {
        tracing::debug!(movie_id, "Movie has no reviews");
    }
    Ok(reviews)
}
