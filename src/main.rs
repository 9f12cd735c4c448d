use shard_router::cluster::config::RouterConfig;
use shard_router::router::handlers::build_app;
use shard_router::router::service::ShardRouter;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        // .with_max_level(tracing::Level::DEBUG)
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    // 1. Backend list (fatal if missing, empty or malformed):
    let config = RouterConfig::load(&args, |name| std::env::var(name).ok())?;
    tracing::info!(
        "Sharding across {} backend(s), backend timeout {:?}",
        config.backends.len(),
        config.backend_timeout
    );

    // 2. Routing context:
    let router = Arc::new(ShardRouter::from_config(&config));

    // 3. HTTP Router:
    let app = build_app(router);

    // 4. Start HTTP server:
    tracing::info!("HTTP server listening on {}", config.bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
