use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// TMDb movie identifier
pub type MovieId = u64;

/// TMDb genre identifier
pub type GenreId = u32;

/// Identifies a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovieRef {
    pub id: MovieId,
    pub title: String,
}

impl MovieRef {
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

impl Display for MovieRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.title, self.id)
    }
}

/// A non-target movie with at least one review, possibly blank
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub movie: MovieRef,
    pub reviews: Vec<String>,
}

/// A candidate with its similarity to the target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub candidate: Candidate,
    pub score: f64,
}

// ============================================================================
// TMDb API Types
// ============================================================================

/// Paginated listing returned by search, reviews and discover
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPage<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Movie entry in search and discover listings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMovie {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
}

impl From<ApiMovie> for MovieRef {
    fn from(movie: ApiMovie) -> Self {
        MovieRef {
            id: movie.id,
            title: movie.title,
        }
    }
}

/// Response from GET /movie/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMovieDetails {
    #[serde(default)]
    pub genres: Vec<ApiGenre>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiGenre {
    pub id: GenreId,
    #[serde(default)]
    pub name: String,
}

/// Entry in GET /movie/{id}/reviews
#[derive(Debug, Clone, Deserialize)]
pub struct ApiReview {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
}
