use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::User;

#[derive(Debug)]
pub enum UserRepositoryError {
    DatabaseError(String),
}

impl std::fmt::Display for UserRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for UserRepositoryError {}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserRepositoryError>;

    /// Case-insensitive exact-name lookup, matching how users are addressed
    /// in the chatbot command.
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, UserRepositoryError>;

    /// Find-or-create under the unique constraint on `users.name`. Used once
    /// at startup to provision the chatbot identity.
    async fn find_or_create(&self, name: &str) -> Result<User, UserRepositoryError>;
}
