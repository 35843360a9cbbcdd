use rsvp_store::HeaderStyle;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let header_style = std::env::var("RSVP_STORE_HEADERS")
        .ok()
        .and_then(|name| HeaderStyle::from_name(&name))
        .unwrap_or_default();
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, ?header_style, "rsvp store listening");
    rsvp_store::run(listener, header_style).await
}
