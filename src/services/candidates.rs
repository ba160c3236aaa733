use std::collections::HashSet;
use std::sync::Arc;

use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    error::{AppError, AppResult},
    models::{Candidate, GenreId, MovieId, MovieRef},
    services::{attributes, providers::CatalogProvider},
};

/// Fetches discovery pages `1..=page_count` and concatenates them in request order
///
/// Movies repeated across pages are kept only at their first position.
pub async fn discover_pool(
    provider: &dyn CatalogProvider,
    genre_ids: &[GenreId],
    page_count: u32,
) -> AppResult<Vec<MovieRef>> {
    let mut seen = HashSet::new();
    let mut pool = Vec::new();
    let mut duplicates = 0usize;

    for page in 1..=page_count {
        for movie in provider.discover_movies(genre_ids, page).await? {
            if seen.insert(movie.id) {
                pool.push(movie);
            } else {
                duplicates += 1;
            }
        }
    }

    if duplicates > 0 {
        tracing::warn!(duplicates, "Discover pages repeated movies; duplicates dropped");
    }

    tracing::info!(
        pages = page_count,
        pool_size = pool.len(),
        "Candidate pool discovered"
    );

    Ok(pool)
}

/// Fetches reviews for every pool movie except the target
///
/// Fetches run in a `JoinSet` with at most `concurrency` in flight. Results are put back
/// in pool order so the returned candidates keep discovery order. Movies without reviews
/// are dropped. The first failed fetch aborts the whole collection and cancels the
/// fetches still running.
pub async fn fetch_candidates(
    provider: Arc<dyn CatalogProvider>,
    pool: Vec<MovieRef>,
    target_id: MovieId,
    concurrency: usize,
) -> AppResult<Vec<Candidate>> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();
    let mut fetched = 0usize;

    for (index, movie) in pool
        .into_iter()
        .filter(|movie| movie.id != target_id)
        .enumerate()
    {
        let provider = Arc::clone(&provider);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;
            let reviews = attributes::reviews(provider.as_ref(), movie.id).await?;
            Ok::<_, AppError>((index, movie, reviews))
        });
        fetched += 1;
    }

    let mut slots: Vec<Option<(MovieRef, Vec<String>)>> = vec![None; fetched];

    while let Some(joined) = tasks.join_next().await {
        let (index, movie, reviews) = joined
            .map_err(|e| AppError::Internal(format!("Review fetch task failed: {}", e)))??;
        slots[index] = Some((movie, reviews));
    }

    let mut candidates = Vec::with_capacity(fetched);
    let mut without_reviews = 0usize;

    for (movie, reviews) in slots.into_iter().flatten() {
        if reviews.is_empty() {
            without_reviews += 1;
        } else {
            candidates.push(Candidate { movie, reviews });
        }
    }

    tracing::info!(
        candidates = candidates.len(),
        without_reviews,
        "Candidate reviews fetched"
    );

    Ok(candidates)
}

/// Discovers the genre-matching pool and turns it into reviewed candidates
pub async fn collect(
    provider: Arc<dyn CatalogProvider>,
    genre_ids: &[GenreId],
    page_count: u32,
    target_id: MovieId,
    concurrency: usize,
) -> AppResult<Vec<Candidate>> {
    let pool = discover_pool(provider.as_ref(), genre_ids, page_count).await?;
    fetch_candidates(provider, pool, target_id, concurrency).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockCatalogProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn movie(id: MovieId) -> MovieRef {
        MovieRef::new(id, format!("Movie {}", id))
    }

    #[tokio::test]
    async fn test_pages_requested_in_order_and_concatenated() {
        let mut provider = MockCatalogProvider::new();
        let mut seq = mockall::Sequence::new();
        for page in 1..=3u32 {
            provider
                .expect_discover_movies()
                .withf(move |genres, p| genres == [18, 53] && *p == page)
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_, p| Ok(vec![movie(p as u64 * 10), movie(p as u64 * 10 + 1)]));
        }

        let pool = discover_pool(&provider, &[18, 53], 3).await.unwrap();
        let ids: Vec<MovieId> = pool.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![10, 11, 20, 21, 30, 31]);
    }

    #[tokio::test]
    async fn test_duplicates_across_pages_dropped() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_discover_movies().returning(|_, page| match page {
            1 => Ok(vec![movie(1), movie(2)]),
            _ => Ok(vec![movie(2), movie(3)]),
        });

        let pool = discover_pool(&provider, &[18], 2).await.unwrap();
        let ids: Vec<MovieId> = pool.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_zero_pages_is_empty_pool() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_discover_movies().times(0);

        assert!(discover_pool(&provider, &[18], 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_target_excluded_and_reviewless_dropped() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_movie_reviews()
            .withf(|id| *id != 1124)
            .returning(|id| match id {
                2 => Ok(vec![]),
                _ => Ok(vec![format!("review of {}", id)]),
            });

        let pool = vec![movie(1), movie(1124), movie(2), movie(3)];
        let candidates = fetch_candidates(Arc::new(provider), pool, 1124, 4)
            .await
            .unwrap();

        let ids: Vec<MovieId> = candidates.iter().map(|c| c.movie.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(candidates[1].reviews, vec!["review of 3".to_string()]);
    }

    #[tokio::test]
    async fn test_discovery_order_kept_with_concurrency() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_movie_reviews()
            .returning(|id| Ok(vec![format!("text {}", id)]));

        let pool: Vec<MovieRef> = (1..=20).map(movie).collect();
        let candidates = fetch_candidates(Arc::new(provider), pool, 0, 8)
            .await
            .unwrap();

        let ids: Vec<MovieId> = candidates.iter().map(|c| c.movie.id).collect();
        assert_eq!(ids, (1..=20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_fetches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut provider = MockCatalogProvider::new();
        provider.expect_movie_reviews().returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec!["ok".to_string()])
        });

        let candidates = fetch_candidates(Arc::new(provider), vec![movie(1), movie(2)], 0, 0)
            .await
            .unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    /// Fails reviews for movie 1 and stalls before answering for every other movie
    struct StallingProvider {
        completed: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl CatalogProvider for StallingProvider {
        async fn search_movies(&self, _query: &str) -> AppResult<Vec<MovieRef>> {
            Ok(vec![])
        }

        async fn movie_genres(&self, _movie_id: MovieId) -> AppResult<Vec<GenreId>> {
            Ok(vec![])
        }

        async fn movie_reviews(&self, movie_id: MovieId) -> AppResult<Vec<String>> {
            if movie_id == 1 {
                return Err(AppError::ExternalApi("status 500".to_string()));
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
            self.completed.fetch_add(1, Ordering::SeqCst);
            Ok(vec!["late review".to_string()])
        }

        async fn discover_movies(
            &self,
            _genre_ids: &[GenreId],
            _page: u32,
        ) -> AppResult<Vec<MovieRef>> {
            Ok(vec![])
        }

        fn name(&self) -> &'static str {
            "stalling"
        }
    }

    #[tokio::test]
    async fn test_review_failure_cancels_pending_fetches() {
        let completed = Arc::new(AtomicUsize::new(0));
        let provider = StallingProvider {
            completed: Arc::clone(&completed),
        };

        let result = fetch_candidates(
            Arc::new(provider),
            vec![movie(2), movie(1), movie(3)],
            0,
            3,
        )
        .await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(completed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_review_failure_aborts() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_movie_reviews().returning(|id| {
            if id == 2 {
                Err(AppError::ExternalApi("status 500".to_string()))
            } else {
                Ok(vec!["fine".to_string()])
            }
        });

        let result = fetch_candidates(Arc::new(provider), vec![movie(1), movie(2)], 0, 1).await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }
}
