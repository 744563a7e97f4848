pub mod message_repository;
pub mod user_repository;

pub use message_repository::{MessageRepository, MessageWithAuthor, NewChatMessage};
pub use user_repository::UserRepository;
