use axum::{Json, Router, response::IntoResponse, routing::post};
use serde_json::json;
use std::sync::Arc;

use crate::presentation::http::handlers::ChatHandler;

pub fn chat_routes(chat_handler: Arc<ChatHandler>) -> Router {
    Router::new()
        .route(
            "/api/chat-history",
            post(ChatHandler::chat_history).get(chat_history_alive),
        )
        .route(
            "/api/user-chat",
            post(ChatHandler::user_chat).get(user_chat_alive),
        )
        .with_state(chat_handler)
}

async fn chat_history_alive() -> impl IntoResponse {
    Json(json!({ "status": "Chat history API is alive" }))
}

async fn user_chat_alive() -> impl IntoResponse {
    Json(json!({ "status": "User chat API is alive" }))
}
