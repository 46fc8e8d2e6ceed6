use std::sync::Arc;

use anime_recommender::{
    config::{Config, EngineSettings},
    routes::{create_router, AppState},
    services::{
        catalog::{CatalogProvider, JikanCatalog},
        rate_limit::FixedInterval,
        RecommendationEngine,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("anime_recommender=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let catalog: Arc<dyn CatalogProvider> = Arc::new(JikanCatalog::new(
        config.catalog_api_url.clone(),
        config.http_timeout(),
    )?);

    let engine = RecommendationEngine::new(
        catalog.clone(),
        Arc::new(FixedInterval::new(config.request_delay())),
        EngineSettings::from(&config),
    );

    let app = create_router(AppState {
        engine: Arc::new(engine),
        catalog,
    });

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        address = %address,
        catalog = %config.catalog_api_url,
        request_delay_ms = config.request_delay_ms,
        "Server running"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
