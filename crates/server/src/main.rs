use pagecut_server::{ServerConfig, app};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    let addr = config.socket_addr();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, domains = ?config.allowed_domains, "pagecut-server listening");

    axum::serve(listener, app(&config)).await?;
    Ok(())
}
