use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{ChatMessage, MessageBody};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequestDto {
    pub channel_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub text: Option<String>,
    pub attachments: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessageDto {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub user_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub message: MessageBody,
    pub created_at: DateTime<Utc>,
    pub total_replies: i32,
}

impl From<ChatMessage> for ChatMessageDto {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id(),
            channel_id: message.channel_id(),
            user_id: message.user_id(),
            parent_id: message.parent_id(),
            created_at: message.created_at(),
            total_replies: message.total_replies(),
            message: message.into_body(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostMessageResponseDto {
    pub message: ChatMessageDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chatbot_reply: Option<ChatMessageDto>,
}
