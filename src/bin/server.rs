use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vision_product_search::{
    catalog::FileCatalog,
    config::{api_key_from_env, ServerConfig},
    providers::VisionProvider,
    server::{make_app, AppState},
    SearchEngine,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "product_search_server=debug,vision_product_search=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    tracing::info!("🚀 Starting Vision Product Search Server");
    tracing::info!("📦 Catalog: {}", config.catalog_path.display());
    tracing::info!("👁️ Vision API: {}", config.vision.api_url);
    if api_key_from_env().is_none() {
        tracing::warn!("⚠️ No Vision API key set, image search will answer 500");
    }

    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()?;

    let engine = SearchEngine::new(
        Arc::new(FileCatalog::new(config.catalog_path.clone())),
        Arc::new(VisionProvider::new(client.clone(), config.vision.clone())),
    );

    let addr = config.bind_addr();
    let app = make_app(AppState::new(config, engine, client));

    tracing::info!("🔎 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
