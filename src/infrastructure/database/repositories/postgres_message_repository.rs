use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::ChatMessage;
use crate::domain::repositories::MessageRepository;
use crate::domain::repositories::message_repository::{
    MessageRepositoryError, MessageWithAuthor, NewChatMessage,
};
use crate::infrastructure::database::models::{ChatMessageModel, NewChatMessageModel};
use crate::infrastructure::database::schema::{chat_messages, users};
use crate::infrastructure::database::{DbPool, get_connection_from_pool};

pub struct PostgresMessageRepository {
    pool: DbPool,
}

impl PostgresMessageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn insert(
        &self,
        new_message: NewChatMessage,
    ) -> Result<ChatMessage, MessageRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| MessageRepositoryError::DatabaseError(e.to_string()))?;

        let payload = serde_json::to_value(&new_message.body)
            .map_err(|e| MessageRepositoryError::ValidationError(e.to_string()))?;

        let model = NewChatMessageModel {
            channel_id: new_message.channel_id,
            user_id: new_message.user_id,
            parent_id: new_message.parent_id,
            message: payload,
        };

        let inserted = diesel::insert_into(chat_messages::table)
            .values(&model)
            .get_result::<ChatMessageModel>(&mut conn)
            .map_err(|e| MessageRepositoryError::DatabaseError(e.to_string()))?;

        ChatMessage::try_from(inserted).map_err(MessageRepositoryError::ValidationError)
    }

    async fn list_all_with_authors(
        &self,
    ) -> Result<Vec<MessageWithAuthor>, MessageRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| MessageRepositoryError::DatabaseError(e.to_string()))?;

        let rows = chat_messages::table
            .left_join(users::table)
            .select((
                ChatMessageModel::as_select(),
                users::name.nullable(),
            ))
            .order(chat_messages::created_at.asc())
            .load::<(ChatMessageModel, Option<String>)>(&mut conn)
            .map_err(|e| MessageRepositoryError::DatabaseError(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for (model, author_name) in rows {
            let message =
                ChatMessage::try_from(model).map_err(MessageRepositoryError::ValidationError)?;
            messages.push(MessageWithAuthor {
                message,
                author_name,
            });
        }

        Ok(messages)
    }

    async fn increment_reply_count(
        &self,
        message_id: Uuid,
    ) -> Result<(), MessageRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| MessageRepositoryError::DatabaseError(e.to_string()))?;

        diesel::update(chat_messages::table.find(message_id))
            .set(chat_messages::total_replies.eq(chat_messages::total_replies + 1))
            .execute(&mut conn)
            .map_err(|e| MessageRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
