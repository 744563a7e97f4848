mod application;
mod domain;
mod infrastructure;
mod presentation;

use infrastructure::AppContainer;
use presentation::http::HttpServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let container = AppContainer::new().await?;

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok());

    let server = HttpServer::new(
        container.chat_handler.clone(),
        container.message_handler.clone(),
        container.index_handler.clone(),
        port,
    );

    server.run().await
}
