use std::sync::Arc;

use uuid::Uuid;

use crate::application::ports::vector_index::MetadataFilter;
use crate::application::ports::{EmbeddingProvider, VectorIndex};

#[derive(Debug)]
pub enum RetrievalError {
    EmbeddingError(String),
    IndexError(String),
}

impl std::fmt::Display for RetrievalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetrievalError::EmbeddingError(msg) => write!(f, "Embedding error: {}", msg),
            RetrievalError::IndexError(msg) => write!(f, "Index error: {}", msg),
        }
    }
}

impl std::error::Error for RetrievalError {}

/// One retrieved chunk of chat history, as fed to the synthesizer and echoed
/// back to API callers.
#[derive(Debug, Clone)]
pub struct ContextSnippet {
    pub text: String,
    pub user_name: Option<String>,
    pub created_at: Option<String>,
    pub score: f32,
}

/// Embeds a query and runs nearest-neighbor search over the indexed chat
/// history, optionally scoped to one user's authored messages.
pub struct RetrievalService {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_index: Arc<dyn VectorIndex>,
}

impl RetrievalService {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            embedding_provider,
            vector_index,
        }
    }

    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
        author_filter: Option<Uuid>,
    ) -> Result<Vec<ContextSnippet>, RetrievalError> {
        let query_vector = self
            .embedding_provider
            .embed(query)
            .await
            .map_err(|e| RetrievalError::EmbeddingError(e.to_string()))?;

        let filter =
            author_filter.map(|user_id| MetadataFilter::equals("user_id", user_id.to_string()));

        let matches = self
            .vector_index
            .query(&query_vector, top_k, filter.as_ref())
            .await
            .map_err(|e| RetrievalError::IndexError(e.to_string()))?;

        let snippets = matches
            .into_iter()
            .map(|hit| ContextSnippet {
                text: hit
                    .metadata
                    .get("text")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                user_name: hit
                    .metadata
                    .get("user_name")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
                created_at: hit
                    .metadata
                    .get("created_at")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
                score: hit.score,
            })
            .collect();

        Ok(snippets)
    }
}
