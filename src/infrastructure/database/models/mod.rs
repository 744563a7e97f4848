pub mod message_model;
pub mod user_model;

pub use message_model::{ChatMessageModel, NewChatMessageModel};
pub use user_model::{NewUserModel, UserModel};
