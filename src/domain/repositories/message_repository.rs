use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{ChatMessage, MessageBody};

#[derive(Debug)]
pub enum MessageRepositoryError {
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for MessageRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            MessageRepositoryError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for MessageRepositoryError {}

/// Insert payload for one chat row. The row id and timestamp come from the
/// database defaults.
#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub channel_id: Uuid,
    pub user_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub body: MessageBody,
}

/// A message joined with its author's display name. Authorless rows keep
/// `None` and are rendered as "Unknown User" downstream.
#[derive(Debug, Clone)]
pub struct MessageWithAuthor {
    pub message: ChatMessage,
    pub author_name: Option<String>,
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn insert(&self, new_message: NewChatMessage)
    -> Result<ChatMessage, MessageRepositoryError>;

    /// Full table snapshot in chronological order, used by the index
    /// maintenance job.
    async fn list_all_with_authors(&self) -> Result<Vec<MessageWithAuthor>, MessageRepositoryError>;

    /// Bumps the denormalized reply counter on a thread root.
    async fn increment_reply_count(&self, message_id: Uuid)
    -> Result<(), MessageRepositoryError>;
}
