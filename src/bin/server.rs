//! Registration backend entry point.
//!
//! Serves the connect-token proxy and webhook forwarder on the
//! configured port (default 3000).

use pleme_cadastro::service::{AppState, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServiceConfig::from_env().map_err(|e| {
        tracing::error!("Configuration error: {e}");
        e
    })?;

    if config.client_id.is_none() || config.client_secret.is_none() {
        tracing::warn!(
            "PLUGGY_CLIENT_ID / PLUGGY_CLIENT_SECRET not set; \
             the connect-token route will return a configuration error"
        );
    }

    let port = config.port;
    let app = pleme_cadastro::service::app(AppState::new(config));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Registration backend listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
