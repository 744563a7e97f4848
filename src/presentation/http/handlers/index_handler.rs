use axum::{Json, extract::State, response::IntoResponse};
use std::sync::Arc;

use crate::application::use_cases::ReindexMessagesUseCase;
use crate::presentation::http::dto::ReindexResponseDto;
use crate::presentation::http::errors::ApiError;

pub struct IndexHandler {
    reindex_use_case: Arc<ReindexMessagesUseCase>,
}

impl IndexHandler {
    pub fn new(reindex_use_case: Arc<ReindexMessagesUseCase>) -> Self {
        Self { reindex_use_case }
    }

    pub async fn upsert_embeddings(
        State(handler): State<Arc<IndexHandler>>,
    ) -> Result<impl IntoResponse, ApiError> {
        let summary = handler.reindex_use_case.execute().await.map_err(|e| {
            tracing::error!("Reindex run failed: {}", e);
            ApiError::internal("Failed to upsert embeddings", e)
        })?;

        tracing::info!(
            "Reindexed {} messages into {} vectors ({} orphans deleted)",
            summary.message_count,
            summary.vector_count,
            summary.deleted_count
        );

        Ok(Json(ReindexResponseDto {
            success: true,
            message: "Embeddings upserted successfully".to_string(),
            count: summary.vector_count,
        }))
    }
}
