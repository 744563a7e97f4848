pub mod chat_dto;
pub mod message_dto;
pub mod reindex_dto;

pub use chat_dto::{
    ChatHistoryRequestDto, ChatbotAnswerDto, ContextSnippetDto, LivenessDto, UserChatRequestDto,
};
pub use message_dto::{ChatMessageDto, PostMessageRequestDto, PostMessageResponseDto};
pub use reindex_dto::ReindexResponseDto;
