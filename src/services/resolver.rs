use crate::{
    error::{AppError, AppResult},
    models::MovieRef,
    services::providers::CatalogProvider,
};

/// Resolves a free-text title to the catalog's best match
///
/// The provider's relevance order is trusted as-is: the first result wins. `None` means
/// the search came back empty.
pub async fn resolve(provider: &dyn CatalogProvider, title: &str) -> AppResult<Option<MovieRef>> {
    if title.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Movie title cannot be empty".to_string(),
        ));
    }

    let target = provider.search_movies(title).await?.into_iter().next();

    match &target {
        Some(movie) => tracing::info!(query = %title, resolved = %movie, "Title resolved"),
        None => tracing::info!(query = %title, "No catalog match for title"),
    }

    Ok(target)
}
