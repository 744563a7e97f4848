use axum::{Json, extract::State, response::IntoResponse};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::imitate_user::{ImitateUserError, ImitateUserRequest};
use crate::application::use_cases::search_history::SearchHistoryRequest;
use crate::application::use_cases::{ImitateUserUseCase, SearchHistoryUseCase};
use crate::presentation::http::dto::{ChatHistoryRequestDto, ChatbotAnswerDto, UserChatRequestDto};
use crate::presentation::http::errors::ApiError;

pub struct ChatHandler {
    search_history_use_case: Arc<SearchHistoryUseCase>,
    imitate_user_use_case: Arc<ImitateUserUseCase>,
}

impl ChatHandler {
    pub fn new(
        search_history_use_case: Arc<SearchHistoryUseCase>,
        imitate_user_use_case: Arc<ImitateUserUseCase>,
    ) -> Self {
        Self {
            search_history_use_case,
            imitate_user_use_case,
        }
    }

    pub async fn chat_history(
        State(handler): State<Arc<ChatHandler>>,
        Json(params): Json<ChatHistoryRequestDto>,
    ) -> Result<impl IntoResponse, ApiError> {
        let query = params
            .query
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest("Query is required".to_string()))?;

        let request = SearchHistoryRequest {
            query,
            max_results: params.max_results,
        };

        let answer = handler
            .search_history_use_case
            .execute(request)
            .await
            .map_err(|e| ApiError::internal("Internal server error", e))?;

        Ok(Json(ChatbotAnswerDto::from(answer)))
    }

    pub async fn user_chat(
        State(handler): State<Arc<ChatHandler>>,
        Json(params): Json<UserChatRequestDto>,
    ) -> Result<impl IntoResponse, ApiError> {
        let (Some(query), Some(user_id)) = (
            params.query.filter(|q| !q.trim().is_empty()),
            params.user_id,
        ) else {
            return Err(ApiError::BadRequest(
                "Query and userId are required".to_string(),
            ));
        };

        let user_id = Uuid::parse_str(&user_id)
            .map_err(|_| ApiError::BadRequest("userId must be a valid UUID".to_string()))?;

        let request = ImitateUserRequest {
            user_id,
            query,
            max_results: params.max_results,
        };

        let answer = handler
            .imitate_user_use_case
            .execute(request)
            .await
            .map_err(|e| match e {
                ImitateUserError::UserNotFound(_) => {
                    ApiError::NotFound("User not found".to_string())
                }
                other => ApiError::internal("Internal server error", other),
            })?;

        Ok(Json(ChatbotAnswerDto::from(answer)))
    }
}
