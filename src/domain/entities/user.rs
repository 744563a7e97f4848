use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display name of the sentinel user that authors synthetic replies.
pub const CHATBOT_NAME: &str = "Chatbot";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            created_at: Utc::now(),
        }
    }

    pub fn restore(id: Uuid, name: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_chatbot(&self) -> bool {
        self.name == CHATBOT_NAME
    }
}
