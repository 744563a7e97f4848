use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Extra metadata carried inside the message JSONB payload. Set on synthetic
/// chatbot replies to record which user's style the answer imitates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imitating_user: Option<String>,
}

/// The JSONB payload of a chat message row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl MessageBody {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachments: None,
            metadata: None,
        }
    }

    pub fn imitating(text: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachments: None,
            metadata: Some(MessageMetadata {
                imitating_user: Some(user_name.into()),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    id: Uuid,
    channel_id: Uuid,
    user_id: Option<Uuid>,
    parent_id: Option<Uuid>,
    body: MessageBody,
    created_at: DateTime<Utc>,
    total_replies: i32,
}

impl ChatMessage {
    pub fn new(
        channel_id: Uuid,
        user_id: Option<Uuid>,
        parent_id: Option<Uuid>,
        body: MessageBody,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel_id,
            user_id,
            parent_id,
            body,
            created_at: Utc::now(),
            total_replies: 0,
        }
    }

    /// Rebuilds a message from persisted state, keeping its stored identity.
    pub fn restore(
        id: Uuid,
        channel_id: Uuid,
        user_id: Option<Uuid>,
        parent_id: Option<Uuid>,
        body: MessageBody,
        created_at: DateTime<Utc>,
        total_replies: i32,
    ) -> Self {
        Self {
            id,
            channel_id,
            user_id,
            parent_id,
            body,
            created_at,
            total_replies,
        }
    }

    // Getters
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn channel_id(&self) -> Uuid {
        self.channel_id
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    pub fn parent_id(&self) -> Option<Uuid> {
        self.parent_id
    }

    pub fn body(&self) -> &MessageBody {
        &self.body
    }

    pub fn into_body(self) -> MessageBody {
        self.body
    }

    pub fn text(&self) -> &str {
        &self.body.text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn total_replies(&self) -> i32 {
        self.total_replies
    }

    // Business logic methods
    pub fn is_thread_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    pub fn imitating_user(&self) -> Option<&str> {
        self.body
            .metadata
            .as_ref()
            .and_then(|m| m.imitating_user.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let channel_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let message = ChatMessage::new(
            channel_id,
            Some(user_id),
            None,
            MessageBody::text_only("hello there"),
        );

        assert_eq!(message.channel_id(), channel_id);
        assert_eq!(message.user_id(), Some(user_id));
        assert_eq!(message.text(), "hello there");
        assert_eq!(message.total_replies(), 0);
        assert!(!message.is_thread_reply());
        assert!(message.imitating_user().is_none());
    }

    #[test]
    fn test_imitation_metadata() {
        let message = ChatMessage::new(
            Uuid::new_v4(),
            Some(Uuid::new_v4()),
            None,
            MessageBody::imitating("an answer", "bob"),
        );

        assert_eq!(message.imitating_user(), Some("bob"));
    }

    #[test]
    fn test_body_serialization_skips_empty_fields() {
        let body = MessageBody::text_only("plain");
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value, serde_json::json!({ "text": "plain" }));
    }
}
