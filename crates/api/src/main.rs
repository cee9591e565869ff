use anyhow::{Context, Result};
use guide_api::{build_app, ApiConfig};
use guide_observability::init_tracing;
use guide_providers::ProviderConfig;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("guide_api");

    let providers = ProviderConfig::from_env();
    let api = ApiConfig::from_env();

    let app = build_app(&providers, &api)?;

    let listener = tokio::net::TcpListener::bind(&api.bind)
        .await
        .with_context(|| format!("failed to bind {}", api.bind))?;
    tracing::info!(
        bind = %api.bind,
        geocoder = %providers.geocoder_url,
        weather = %providers.weather_url,
        places = %providers.places_url,
        "travel guide api started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
