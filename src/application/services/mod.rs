pub mod answer_service;
pub mod message_chunker;
pub mod retrieval_service;

pub use answer_service::AnswerService;
pub use message_chunker::MessageChunker;
pub use retrieval_service::RetrievalService;
