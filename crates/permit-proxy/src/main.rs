//! permit-proxy: static UI plus the `/api` relay.

use std::net::SocketAddr;

use anyhow::Context;
use permit_proxy::{build_router, ProxyConfig, ProxyState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "permit_proxy=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ProxyConfig::from_env();

    match config.upstream_url() {
        Ok(url) => tracing::info!("Upstream: {}", url),
        Err(e) => {
            tracing::warn!("************************************************************");
            tracing::warn!("  Upstream is not usable: {}", e);
            tracing::warn!("  Every /api request will answer 500 until it is fixed.");
            tracing::warn!("************************************************************");
        }
    }
    tracing::info!("Serving static files from: {}", config.static_dir.display());

    let port = config.port;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = build_router(ProxyState::new(config));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!("Port {} is already in use", port);
            }
            return Err(e).with_context(|| format!("binding {addr}"));
        }
    };
    tracing::info!("permit-proxy listening on http://{}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
