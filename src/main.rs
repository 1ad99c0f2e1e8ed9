use tracing::info;
use tracing_subscriber::EnvFilter;
use northwind_api::interface::api::{start_server, ServerConfig};
use northwind_api::VERSION;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("northwind_api=info,tower_http=info")),
        )
        .init();
    info!("Northwind JSON API version: {}", VERSION);

    let config = ServerConfig::from_env();
    start_server(config).await?;
    Ok(())
}
