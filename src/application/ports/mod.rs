pub mod chat_completion;
pub mod embedding_provider;
pub mod vector_index;

pub use chat_completion::ChatCompletionProvider;
pub use embedding_provider::EmbeddingProvider;
pub use vector_index::VectorIndex;
