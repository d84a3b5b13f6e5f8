use std::{env, sync::Arc};

use anyhow::{Context, Result};
use milk_rate_engine::{
    api::{AppState, create_router},
    config::ConfigLoader,
    grid::GridSource,
    reload::ReloadController,
};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

const CONFIG_ENV_VAR: &str = "RATE_ENGINE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config/rate-engine.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = env::args()
        .nth(1)
        .or_else(|| env::var(CONFIG_ENV_VAR).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = ConfigLoader::load(&config_path)
        .with_context(|| format!("loading configuration from {}", config_path))?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();
    info!(config = %config_path, "startup");

    let source: Arc<dyn GridSource> = Arc::new(config.grid_source());
    let controller = Arc::new(ReloadController::new());

    // The service starts even without a chart; lookups answer RATE_UNAVAILABLE
    // until a reload succeeds.
    match controller.reload_async(Arc::clone(&source)).await {
        Ok(summary) => info!(
            source = %source.describe(),
            rows = summary.row_count,
            columns = summary.column_count,
            "Initial rate chart loaded"
        ),
        Err(err) => error!(
            source = %source.describe(),
            error = %err,
            "Initial rate chart load failed, serving without a table"
        ),
    }

    let router = create_router(AppState::new(controller, source));
    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("binding {}", config.bind_address()))?;
    info!(address = %config.bind_address(), "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("shutdown requested"),
                Err(err) => {
                    error!(error = %err, "failed to listen for shutdown signal");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await
        .context("serving HTTP")?;

    Ok(())
}
