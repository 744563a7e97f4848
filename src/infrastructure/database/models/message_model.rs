use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::{ChatMessage, MessageBody};
use crate::infrastructure::database::schema::chat_messages;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable)]
#[diesel(table_name = chat_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChatMessageModel {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub user_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub message: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub total_replies: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = chat_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewChatMessageModel {
    pub channel_id: Uuid,
    pub user_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub message: serde_json::Value,
}

impl TryFrom<ChatMessageModel> for ChatMessage {
    type Error = String;

    fn try_from(model: ChatMessageModel) -> Result<Self, Self::Error> {
        let body: MessageBody = serde_json::from_value(model.message)
            .map_err(|e| format!("Invalid message payload for row {}: {}", model.id, e))?;

        Ok(ChatMessage::restore(
            model.id,
            model.channel_id,
            model.user_id,
            model.parent_id,
            body,
            model.created_at,
            model.total_replies,
        ))
    }
}
