pub mod openai_completions;
pub mod openai_embeddings;
pub mod pinecone_index;

pub use openai_completions::{OpenAiCompletionsClient, OpenAiCompletionsConfig};
pub use openai_embeddings::{OpenAiEmbeddingsClient, OpenAiEmbeddingsConfig};
pub use pinecone_index::{PineconeConfig, PineconeIndexClient};
