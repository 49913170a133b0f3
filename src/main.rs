//! Triage service entry point.
//!
//! Loads configuration from the environment (and `.env`), fits the classifier once, then serves
//! the REST API until the process is stopped.

use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use triage_core::{
    CoreConfig, DEFAULT_DATA_DIR, SyntheticClassifier, config::password_iterations_from_env_value,
    config::session_ttl_from_env_value,
};

/// Main entry point for the triage service
///
/// # Environment Variables
/// - `TRIAGE_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `TRIAGE_DATA_DIR`: Directory for evaluations and accounts (default: "triage_data")
/// - `TRIAGE_PASSWORD_ITERATIONS`: PBKDF2 rounds for new passwords (default: 600000)
/// - `TRIAGE_SESSION_TTL_SECS`: Lifetime of a login session in seconds (default: 43200)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid or the data directory cannot be created,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("triage=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("TRIAGE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let data_dir =
        std::env::var("TRIAGE_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.into());
    let password_iterations =
        password_iterations_from_env_value(std::env::var("TRIAGE_PASSWORD_ITERATIONS").ok())?;

    let session_ttl_secs =
        session_ttl_from_env_value(std::env::var("TRIAGE_SESSION_TTL_SECS").ok())?;

    let cfg = Arc::new(
        CoreConfig::new(PathBuf::from(data_dir), password_iterations)?
            .with_session_ttl_secs(session_ttl_secs)?,
    );
    cfg.ensure_data_dir()?;

    let classifier = Arc::new(SyntheticClassifier::pretrained());
    tracing::info!("++ Classifier fitted on synthetic corpus");

    let app = router(AppState::new(cfg.clone(), classifier));

    tracing::info!("++ Starting triage REST on {}", rest_addr);
    tracing::info!("++ Storing records under {}", cfg.data_dir().display());

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
