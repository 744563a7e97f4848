pub mod handle_chatbot_command;
pub mod imitate_user;
pub mod post_message;
pub mod reindex_messages;
pub mod search_history;

pub use handle_chatbot_command::HandleChatbotCommandUseCase;
pub use imitate_user::ImitateUserUseCase;
pub use post_message::PostMessageUseCase;
pub use reindex_messages::ReindexMessagesUseCase;
pub use search_history::SearchHistoryUseCase;
