use std::{net::SocketAddr, sync::Arc};

use anyhow::Result as AnyResult;
use shawarma_engine::Marketplace;
use shawarma_gateway::{AppState, router};
use shawarma_platform::ServiceConfig;
use shawarma_support::completion_backend;
use tracing::info;

#[tokio::main]
async fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "shawarma_gateway=info".to_string()),
        )
        .init();

    let config = ServiceConfig::from_env("0.0.0.0:8080")?;
    let completion = completion_backend(
        config.gemini_api_key.as_deref(),
        &config.gemini_model,
        config.completion_timeout,
    )?;
    let market = Arc::new(Marketplace::seeded()?);

    let state = AppState::new(market, completion, config.completion_timeout);
    let router = router(state);

    let addr: SocketAddr = config.http_addr.parse()?;
    info!("gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
