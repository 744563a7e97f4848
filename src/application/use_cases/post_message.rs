use std::sync::Arc;

use uuid::Uuid;

use crate::application::use_cases::handle_chatbot_command::{
    CommandOutcome, HandleChatbotCommandUseCase,
};
use crate::domain::entities::{ChatMessage, MessageBody};
use crate::domain::repositories::MessageRepository;
use crate::domain::repositories::message_repository::NewChatMessage;

#[derive(Debug)]
pub enum PostMessageError {
    ValidationError(String),
    RepositoryError(String),
    ChatbotError(String),
}

impl std::fmt::Display for PostMessageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostMessageError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            PostMessageError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            PostMessageError::ChatbotError(msg) => write!(f, "Chatbot error: {}", msg),
        }
    }
}

impl std::error::Error for PostMessageError {}

#[derive(Debug, Clone)]
pub struct PostMessageRequest {
    pub channel_id: Uuid,
    pub user_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub text: String,
    pub attachments: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct PostMessageResponse {
    pub message: ChatMessage,
    /// Present when the posted text was a chatbot command and a synthetic
    /// reply was written to the same channel.
    pub chatbot_reply: Option<ChatMessage>,
}

/// Inserts a user-authored chat row, maintains the thread reply counter, and
/// triggers the chatbot pipeline when the text matches the command grammar.
pub struct PostMessageUseCase {
    message_repository: Arc<dyn MessageRepository>,
    chatbot_command: Arc<HandleChatbotCommandUseCase>,
}

impl PostMessageUseCase {
    pub fn new(
        message_repository: Arc<dyn MessageRepository>,
        chatbot_command: Arc<HandleChatbotCommandUseCase>,
    ) -> Self {
        Self {
            message_repository,
            chatbot_command,
        }
    }

    pub async fn execute(
        &self,
        request: PostMessageRequest,
    ) -> Result<PostMessageResponse, PostMessageError> {
        if request.text.trim().is_empty() {
            return Err(PostMessageError::ValidationError(
                "Message text cannot be empty".to_string(),
            ));
        }

        let body = MessageBody {
            text: request.text.clone(),
            attachments: request.attachments.clone(),
            metadata: None,
        };

        let message = self
            .message_repository
            .insert(NewChatMessage {
                channel_id: request.channel_id,
                user_id: Some(request.user_id),
                parent_id: request.parent_id,
                body,
            })
            .await
            .map_err(|e| PostMessageError::RepositoryError(e.to_string()))?;

        if let Some(parent_id) = request.parent_id {
            self.message_repository
                .increment_reply_count(parent_id)
                .await
                .map_err(|e| PostMessageError::RepositoryError(e.to_string()))?;
        }

        let chatbot_reply = match self
            .chatbot_command
            .execute(request.channel_id, &request.text)
            .await
            .map_err(|e| PostMessageError::ChatbotError(e.to_string()))?
        {
            CommandOutcome::Replied(reply) => Some(reply),
            CommandOutcome::NotACommand => None,
        };

        Ok(PostMessageResponse {
            message,
            chatbot_reply,
        })
    }
}
