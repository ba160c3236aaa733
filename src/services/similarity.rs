//! Review-text similarity ranking.
//!
//! All of a movie's reviews are joined into one document. The target is document 0 and
//! the vector space is fit on the whole batch at once, so scores are only comparable
//! within a single ranking.

use std::cmp::Ordering;

use crate::{
    models::{Candidate, RankedResult},
    services::tfidf::{SparseVector, TfidfVectorizer},
};

/// Cosine similarity of two sparse vectors; zero vectors score 0
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let norm_a = a.norm();
    let norm_b = b.norm();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    a.dot(b) / (norm_a * norm_b)
}

/// Joins a movie's reviews into one space-separated document
pub fn combine_reviews(reviews: &[String]) -> String {
    reviews.join(" ")
}

/// Ranks candidates by review similarity to the target, highest first
///
/// The sort is stable: candidates with equal scores keep their input order.
pub fn rank(
    vectorizer: &TfidfVectorizer,
    target_reviews: &[String],
    candidates: Vec<Candidate>,
) -> Vec<RankedResult> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let documents: Vec<String> = std::iter::once(combine_reviews(target_reviews))
        .chain(candidates.iter().map(|c| combine_reviews(&c.reviews)))
        .collect();

    let matrix = vectorizer.fit_transform(&documents);
    let empty = SparseVector::default();
    let target = matrix.row(0).unwrap_or(&empty);

    tracing::debug!(
        documents = documents.len(),
        vocabulary = matrix.vocabulary.len(),
        "Review vector space fit"
    );

    let mut ranked: Vec<RankedResult> = candidates
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| {
            let score = matrix
                .row(index + 1)
                .map(|row| cosine_similarity(target, row))
                .unwrap_or(0.0);
            RankedResult { candidate, score }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    ranked
}
