pub mod attributes;
pub mod candidates;
pub mod providers;
pub mod recommender;
pub mod report;
pub mod resolver;
pub mod similarity;
pub mod stop_words;
pub mod tfidf;

pub use recommender::{Recommendation, Recommender, RecommenderSettings};
pub use report::Reporter;
