pub mod chat_message;
pub mod message_chunk;
pub mod user;

pub use chat_message::{ChatMessage, MessageBody, MessageMetadata};
pub use message_chunk::{ChunkMetadata, EmbeddedChunk, MessageChunk};
pub use user::{CHATBOT_NAME, User};
