use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use visio_server::{HttpMessageStore, ServerConfig, SignalingService};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "visio_server=info,visio_signaling=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::parse();
    info!("Starting signaling server with {:?}", config);

    let store = HttpMessageStore::new(&config.api_url, config.api_timeout())?;
    info!("Chat history served by {}", store.base_url());

    let service = SignalingService::new(Arc::new(store));

    let listener = TcpListener::bind(config.bind_addr()).await?;
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        info!("Received Ctrl+C, shutting down...");
    };

    if let Err(e) = service.clone().serve(listener, shutdown).await {
        error!("Signaling server error: {}", e);
    }

    service.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
