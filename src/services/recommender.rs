use std::io::Write;
use std::sync::Arc;

use crate::{
    config::Config,
    error::AppResult,
    models::{GenreId, MovieRef, RankedResult},
    services::{
        attributes, candidates,
        providers::CatalogProvider,
        report::Reporter,
        resolver,
        similarity,
        tfidf::{TfidfVectorizer, DEFAULT_MAX_DF},
    },
};

/// Knobs for one recommendation run
#[derive(Debug, Clone, PartialEq)]
pub struct RecommenderSettings {
    pub discover_pages: u32,
    pub review_concurrency: usize,
    pub max_df: f64,
}

impl Default for RecommenderSettings {
    fn default() -> Self {
        Self {
            discover_pages: 3,
            review_concurrency: 8,
            max_df: DEFAULT_MAX_DF,
        }
    }
}

impl From<&Config> for RecommenderSettings {
    fn from(config: &Config) -> Self {
        Self {
            discover_pages: config.discover_pages,
            review_concurrency: config.review_concurrency,
            ..Self::default()
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    /// The title search returned nothing
    NotFound,
    /// The target has no genres to discover candidates with
    NoGenres { target: MovieRef },
    /// The target has no reviews to compare against
    NoReviews { target: MovieRef },
    /// Candidates ranked by review similarity, possibly none
    Ranked {
        target: MovieRef,
        genre_ids: Vec<GenreId>,
        ranked: Vec<RankedResult>,
    },
}

/// Runs the search → genres → reviews → discover → rank pipeline
pub struct Recommender {
    provider: Arc<dyn CatalogProvider>,
    settings: RecommenderSettings,
    vectorizer: TfidfVectorizer,
}

impl Recommender {
    pub fn new(provider: Arc<dyn CatalogProvider>, settings: RecommenderSettings) -> Self {
        let vectorizer = TfidfVectorizer::new(settings.max_df);
        Self {
            provider,
            settings,
            vectorizer,
        }
    }

    /// Runs one recommendation, writing progress and the top `top_n` results to `reporter`
    ///
    /// Early exits (not found, no genres, no reviews) are reported and returned as
    /// outcomes. Catalog failures are returned as errors and nothing further is written.
    pub async fn recommend<W: Write>(
        &self,
        title: &str,
        top_n: usize,
        reporter: &mut Reporter<W>,
    ) -> AppResult<Recommendation> {
        tracing::info!(
            title = %title,
            top_n,
            provider = self.provider.name(),
            "Starting recommendation run"
        );

        reporter.searching(title)?;
        let Some(target) = resolver::resolve(self.provider.as_ref(), title).await? else {
            reporter.not_found()?;
            return Ok(Recommendation::NotFound);
        };

        let genre_ids = attributes::genres(self.provider.as_ref(), target.id).await?;
        if genre_ids.is_empty() {
            reporter.no_genres()?;
            return Ok(Recommendation::NoGenres { target });
        }

        let target_reviews = attributes::reviews(self.provider.as_ref(), target.id).await?;
        if target_reviews.is_empty() {
            reporter.no_reviews()?;
            return Ok(Recommendation::NoReviews { target });
        }

        reporter.target_summary(&target.title, target_reviews.len(), &genre_ids)?;

        let candidates = candidates::collect(
            Arc::clone(&self.provider),
            &genre_ids,
            self.settings.discover_pages,
            target.id,
            self.settings.review_concurrency,
        )
        .await?;

        reporter.pool_size(candidates.len())?;

        let ranked = similarity::rank(&self.vectorizer, &target_reviews, candidates);

        tracing::info!(
            target = %target,
            ranked = ranked.len(),
            best_score = ?ranked.first().map(|r| r.score),
            "Recommendation run completed"
        );

        reporter.ranking(&target.title, &ranked, top_n)?;

        Ok(Recommendation::Ranked {
            target,
            genre_ids,
            ranked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, models::MovieId, services::providers::MockCatalogProvider};

    const TARGET: MovieId = 1124;

    fn settings() -> RecommenderSettings {
        RecommenderSettings {
            discover_pages: 2,
            review_concurrency: 2,
            ..RecommenderSettings::default()
        }
    }

    fn run(provider: MockCatalogProvider, top_n: usize) -> (AppResult<Recommendation>, String) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let recommender = Recommender::new(Arc::new(provider), settings());
        let mut reporter = Reporter::new(Vec::new());
        let outcome = runtime.block_on(recommender.recommend("The Prestige", top_n, &mut reporter));
        (outcome, String::from_utf8(reporter.into_inner()).unwrap())
    }

    fn provider_with_pool() -> MockCatalogProvider {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_search_movies()
            .returning(|_| Ok(vec![MovieRef::new(TARGET, "The Prestige")]));
        provider
            .expect_movie_genres()
            .returning(|_| Ok(vec![18, 9648]));
        provider.expect_discover_movies().returning(|_, page| {
            Ok(match page {
                1 => vec![
                    MovieRef::new(1, "Memento"),
                    MovieRef::new(TARGET, "The Prestige"),
                    MovieRef::new(2, "Notting Hill"),
                ],
                _ => vec![
                    MovieRef::new(3, "The Illusionist"),
                    MovieRef::new(4, "No Reviews Yet"),
                ],
            })
        });
        provider.expect_movie_reviews().returning(|id| {
            Ok(match id {
                TARGET => vec![
                    "stage magic rivalry obsession".to_string(),
                    "twist ending".to_string(),
                ],
                1 => vec!["memory twist ending obsession".to_string()],
                2 => vec!["charming romance bookshop".to_string()],
                3 => vec!["stage magic rivalry obsession twist ending".to_string()],
                _ => vec![],
            })
        });
        provider.expect_name().return_const("mock");
        provider
    }

    #[test]
    fn test_full_run_ranks_and_excludes_target() {
        let (outcome, output) = run(provider_with_pool(), 25);

        let Recommendation::Ranked {
            target,
            genre_ids,
            ranked,
        } = outcome.unwrap()
        else {
            panic!("expected a ranking");
        };

        assert_eq!(target.id, TARGET);
        assert_eq!(genre_ids, vec![18, 9648]);
        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|r| r.candidate.movie.id != TARGET));
        assert_eq!(ranked[0].candidate.movie.title, "The Illusionist");
        assert_eq!(ranked[2].candidate.movie.title, "Notting Hill");
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));

        assert!(output.starts_with("Searching for 'The Prestige'..."));
        assert!(output.contains("Pulled 2 reviews for The Prestige"));
        assert!(output.contains("Using genres: [18, 9648]"));
        assert!(output.contains("Comparing with 3 similar-genre movies..."));
        assert!(output.contains("] The Illusionist"));
    }

    #[test]
    fn test_top_n_truncates_output() {
        let (outcome, output) = run(provider_with_pool(), 2);
        assert!(outcome.is_ok());
        assert_eq!(output.lines().filter(|l| l.starts_with('[')).count(), 2);
    }

    #[test]
    fn test_not_found_stops_after_search() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_search_movies().returning(|_| Ok(vec![]));
        provider.expect_movie_genres().times(0);
        provider.expect_discover_movies().times(0);
        provider.expect_name().return_const("mock");

        let (outcome, output) = run(provider, 10);
        assert_eq!(outcome.unwrap(), Recommendation::NotFound);
        assert!(output.contains("Movie not found."));
    }

    #[test]
    fn test_no_genres_stops_before_reviews() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_search_movies()
            .returning(|_| Ok(vec![MovieRef::new(TARGET, "The Prestige")]));
        provider.expect_movie_genres().returning(|_| Ok(vec![]));
        provider.expect_movie_reviews().times(0);
        provider.expect_discover_movies().times(0);
        provider.expect_name().return_const("mock");

        let (outcome, output) = run(provider, 10);
        assert!(matches!(outcome.unwrap(), Recommendation::NoGenres { .. }));
        assert!(output.contains("No genres found for this movie."));
    }

    #[test]
    fn test_no_target_reviews_skips_discovery() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_search_movies()
            .returning(|_| Ok(vec![MovieRef::new(TARGET, "The Prestige")]));
        provider.expect_movie_genres().returning(|_| Ok(vec![18]));
        provider
            .expect_movie_reviews()
            .times(1)
            .returning(|_| Ok(vec![]));
        provider.expect_discover_movies().times(0);
        provider.expect_name().return_const("mock");

        let (outcome, output) = run(provider, 10);
        assert!(matches!(outcome.unwrap(), Recommendation::NoReviews { .. }));
        assert!(output.contains("No reviews found for the target movie."));
        assert!(!output.contains("Comparing with"));
    }

    #[test]
    fn test_empty_pool_reports_zero_results() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_search_movies()
            .returning(|_| Ok(vec![MovieRef::new(TARGET, "The Prestige")]));
        provider.expect_movie_genres().returning(|_| Ok(vec![18]));
        provider
            .expect_movie_reviews()
            .returning(|_| Ok(vec!["lonely review".to_string()]));
        provider
            .expect_discover_movies()
            .returning(|_, _| Ok(vec![MovieRef::new(TARGET, "The Prestige")]));
        provider.expect_name().return_const("mock");

        let (outcome, output) = run(provider, 10);
        let Recommendation::Ranked { ranked, .. } = outcome.unwrap() else {
            panic!("expected a ranking");
        };
        assert!(ranked.is_empty());
        assert!(output.contains("Comparing with 0 similar-genre movies..."));
    }

    #[test]
    fn test_blank_reviewed_candidate_ranked_at_zero() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_search_movies()
            .returning(|_| Ok(vec![MovieRef::new(TARGET, "The Prestige")]));
        provider.expect_movie_genres().returning(|_| Ok(vec![18]));
        provider.expect_discover_movies().returning(|_, page| {
            Ok(match page {
                1 => vec![
                    MovieRef::new(2, "BlankReviewed"),
                    MovieRef::new(3, "Normal"),
                ],
                _ => vec![],
            })
        });
        provider.expect_movie_reviews().returning(|id| {
            Ok(match id {
                TARGET => vec!["stage magic rivalry".to_string()],
                2 => vec![String::new()],
                _ => vec!["other words here".to_string()],
            })
        });
        provider.expect_name().return_const("mock");

        let (outcome, output) = run(provider, 10);
        let Recommendation::Ranked { ranked, .. } = outcome.unwrap() else {
            panic!("expected a ranking");
        };

        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| r.score == 0.0));
        assert!(output.contains("Comparing with 2 similar-genre movies..."));
        assert!(output.contains("[0.000] BlankReviewed"));
        assert!(output.contains("[0.000] Normal"));
    }

    #[test]
    fn test_blank_target_reviews_still_rank() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_search_movies()
            .returning(|_| Ok(vec![MovieRef::new(TARGET, "The Prestige")]));
        provider.expect_movie_genres().returning(|_| Ok(vec![18]));
        provider
            .expect_discover_movies()
            .returning(|_, _| Ok(vec![MovieRef::new(3, "Normal")]));
        provider.expect_movie_reviews().returning(|id| {
            Ok(match id {
                TARGET => vec!["   ".to_string()],
                _ => vec!["other words here".to_string()],
            })
        });
        provider.expect_name().return_const("mock");

        let (outcome, output) = run(provider, 10);
        assert!(matches!(outcome.unwrap(), Recommendation::Ranked { .. }));
        assert!(output.contains("Pulled 1 reviews for The Prestige"));
        assert!(output.contains("[0.000] Normal"));
    }

    #[test]
    fn test_transport_failure_propagates_without_ranking() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_search_movies()
            .returning(|_| Ok(vec![MovieRef::new(TARGET, "The Prestige")]));
        provider.expect_movie_genres().returning(|_| Ok(vec![18]));
        provider
            .expect_movie_reviews()
            .returning(|_| Ok(vec!["target review".to_string()]));
        provider
            .expect_discover_movies()
            .returning(|_, _| Err(AppError::ExternalApi("status 401".to_string())));
        provider.expect_name().return_const("mock");

        let (outcome, output) = run(provider, 10);
        assert!(matches!(outcome, Err(AppError::ExternalApi(_))));
        assert!(!output.contains("review-vibe matches"));
    }
}
