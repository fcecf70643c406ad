use mock_server::{app_with, serve, Envelope, MockConfig};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let mut config = MockConfig::default();
    if let Ok(path) = std::env::var("MOCK_PATH") {
        config.path = path;
    }
    if let Ok(raw) = std::env::var("MOCK_ENVELOPE") {
        config.envelope = raw
            .parse::<Envelope>()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    }

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        %addr,
        path = %config.path,
        envelope = ?config.envelope,
        "mock contacts API listening"
    );
    serve(listener, app_with(config).0).await
}
