use std::sync::Arc;

use anyhow::{Context, Result};

use review_vibes::{
    api::{create_router, AppState, SubprocessRunner},
    config::Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    review_vibes::init_tracing("info");

    let config = Config::from_env()?;
    let runner = SubprocessRunner::from_config(&config)
        .context("Failed to locate the review-vibes binary")?;

    tracing::info!(program = %runner.program().display(), "Using recommendation binary");

    let state = AppState::new(Arc::new(runner));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(address = %addr, "Front end listening");
    axum::serve(listener, app).await?;

    Ok(())
}
