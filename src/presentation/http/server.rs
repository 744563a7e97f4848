use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::presentation::http::{
    handlers::{ChatHandler, IndexHandler, MessageHandler},
    routes::{chat_routes, health_routes, index_routes, message_routes},
};

pub struct HttpServer {
    chat_handler: Arc<ChatHandler>,
    message_handler: Arc<MessageHandler>,
    index_handler: Arc<IndexHandler>,
    port: u16,
}

impl HttpServer {
    pub fn new(
        chat_handler: Arc<ChatHandler>,
        message_handler: Arc<MessageHandler>,
        index_handler: Arc<IndexHandler>,
        port: Option<u16>,
    ) -> Self {
        Self {
            chat_handler,
            message_handler,
            index_handler,
            port: port.unwrap_or(3000),
        }
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let app = Router::new()
            .merge(health_routes())
            .merge(chat_routes(self.chat_handler))
            .merge(message_routes(self.message_handler))
            .merge(index_routes(self.index_handler))
            .layer(cors)
            .layer(RequestBodyLimitLayer::new(1024 * 1024)) // 1MB cap
            .layer(
                TraceLayer::new_for_http()
                    .on_request(
                        |request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {
                            tracing::info!(
                                "Received request: {} {}",
                                request.method(),
                                request.uri()
                            );
                        },
                    )
                    .on_response(
                        |response: &axum::http::Response<axum::body::Body>,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::info!(
                                "Response: {} (took {} ms)",
                                response.status(),
                                latency.as_millis()
                            );
                        },
                    )
                    .on_failure(
                        |error: ServerErrorsFailureClass,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::error!(
                                "Request failed: {:?} (took {} ms)",
                                error,
                                latency.as_millis()
                            );
                        },
                    ),
            );

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);
        axum::serve(listener, app).await?;

        Ok(())
    }
}
