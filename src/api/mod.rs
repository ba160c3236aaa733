pub mod handlers;
pub mod routes;
pub mod runner;
pub mod state;

pub use routes::create_router;
pub use runner::{RecommendationRunner, SubprocessRunner};
pub use state::AppState;
