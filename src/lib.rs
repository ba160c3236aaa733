pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;

/// Installs the stderr tracing subscriber, honoring `RUST_LOG` over `default_filter`
///
/// Stdout is reserved for the run report.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}
