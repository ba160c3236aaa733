use std::sync::Arc;

use super::runner::RecommendationRunner;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<dyn RecommendationRunner>,
}

impl AppState {
    pub fn new(runner: Arc<dyn RecommendationRunner>) -> Self {
        Self { runner }
    }
}
