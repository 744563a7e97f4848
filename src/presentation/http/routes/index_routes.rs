use axum::{Router, routing::post};
use std::sync::Arc;

use crate::presentation::http::handlers::IndexHandler;

pub fn index_routes(index_handler: Arc<IndexHandler>) -> Router {
    Router::new()
        .route("/api/upsert-embeddings", post(IndexHandler::upsert_embeddings))
        .with_state(index_handler)
}
