use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::application::use_cases::PostMessageUseCase;
use crate::application::use_cases::post_message::{PostMessageError, PostMessageRequest};
use crate::presentation::http::dto::{
    ChatMessageDto, PostMessageRequestDto, PostMessageResponseDto,
};
use crate::presentation::http::errors::ApiError;

pub struct MessageHandler {
    post_message_use_case: Arc<PostMessageUseCase>,
}

impl MessageHandler {
    pub fn new(post_message_use_case: Arc<PostMessageUseCase>) -> Self {
        Self { post_message_use_case }
    }

    pub async fn post_message(
        State(handler): State<Arc<MessageHandler>>,
        Json(params): Json<PostMessageRequestDto>,
    ) -> Result<impl IntoResponse, ApiError> {
        let (Some(channel_id), Some(user_id), Some(text)) = (
            params.channel_id,
            params.user_id,
            params.text.filter(|t| !t.trim().is_empty()),
        ) else {
            return Err(ApiError::BadRequest(
                "channelId, userId and text are required".to_string(),
            ));
        };

        let request = PostMessageRequest {
            channel_id,
            user_id,
            parent_id: params.parent_id,
            text,
            attachments: params.attachments,
        };

        let response = handler
            .post_message_use_case
            .execute(request)
            .await
            .map_err(|e| match e {
                PostMessageError::ValidationError(msg) => ApiError::BadRequest(msg),
                other => ApiError::internal("Internal server error", other),
            })?;

        let body = PostMessageResponseDto {
            message: ChatMessageDto::from(response.message),
            chatbot_reply: response.chatbot_reply.map(ChatMessageDto::from),
        };

        Ok((StatusCode::CREATED, Json(body)))
    }
}
