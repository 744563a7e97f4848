use std::collections::HashSet;
use std::sync::Arc;

use futures::future::try_join_all;
use serde_json::{Map, Value, json};

use crate::application::ports::vector_index::VectorRecord;
use crate::application::ports::{EmbeddingProvider, VectorIndex};
use crate::application::services::MessageChunker;
use crate::domain::entities::EmbeddedChunk;
use crate::domain::repositories::MessageRepository;

/// Embedding requests per batch; batches run sequentially to stay under the
/// provider's rate limits, the calls within one batch run concurrently.
const EMBED_BATCH_SIZE: usize = 100;
/// Vectors per upsert request.
const UPSERT_BATCH_SIZE: usize = 100;

#[derive(Debug)]
pub enum ReindexError {
    RepositoryError(String),
    EmbeddingError(String),
    IndexError(String),
}

impl std::fmt::Display for ReindexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReindexError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            ReindexError::EmbeddingError(msg) => write!(f, "Embedding error: {}", msg),
            ReindexError::IndexError(msg) => write!(f, "Index error: {}", msg),
        }
    }
}

impl std::error::Error for ReindexError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReindexSummary {
    pub message_count: usize,
    pub vector_count: usize,
    pub deleted_count: usize,
}

/// Rebuilds the vector index from the current message table snapshot.
///
/// Manually triggered, not scheduled. Any step's failure aborts the whole
/// run; there is no partial-progress checkpointing and the job is re-run
/// from scratch.
pub struct ReindexMessagesUseCase {
    message_repository: Arc<dyn MessageRepository>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_index: Arc<dyn VectorIndex>,
    chunker: MessageChunker,
}

impl ReindexMessagesUseCase {
    pub fn new(
        message_repository: Arc<dyn MessageRepository>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            message_repository,
            embedding_provider,
            vector_index,
            chunker: MessageChunker::default(),
        }
    }

    pub async fn execute(&self) -> Result<ReindexSummary, ReindexError> {
        let messages = self
            .message_repository
            .list_all_with_authors()
            .await
            .map_err(|e| ReindexError::RepositoryError(e.to_string()))?;

        let chunks: Vec<_> = messages
            .iter()
            .flat_map(|message| self.chunker.chunk_message(message))
            .collect();

        tracing::info!(
            "Chunked {} messages into {} chunks",
            messages.len(),
            chunks.len()
        );

        let mut records = Vec::with_capacity(chunks.len());
        for (batch_number, batch) in chunks.chunks(EMBED_BATCH_SIZE).enumerate() {
            tracing::info!(
                "Embedding batch {}/{}",
                batch_number + 1,
                chunks.len().div_ceil(EMBED_BATCH_SIZE)
            );

            let embeddings =
                try_join_all(batch.iter().map(|chunk| self.embedding_provider.embed(&chunk.text)))
                    .await
                    .map_err(|e| ReindexError::EmbeddingError(e.to_string()))?;

            for (chunk, embedding) in batch.iter().zip(embeddings) {
                let embedded = EmbeddedChunk {
                    text: chunk.text.clone(),
                    embedding,
                    metadata: chunk.metadata.clone(),
                };
                records.push(to_vector_record(&embedded));
            }
        }

        for batch in records.chunks(UPSERT_BATCH_SIZE) {
            self.vector_index
                .upsert(batch)
                .await
                .map_err(|e| ReindexError::IndexError(e.to_string()))?;
        }

        let deleted_count = self.delete_orphaned_vectors(&records).await?;

        tracing::info!(
            "Upserted {} vectors, deleted {} orphans",
            records.len(),
            deleted_count
        );

        Ok(ReindexSummary {
            message_count: messages.len(),
            vector_count: records.len(),
            deleted_count,
        })
    }

    /// Deletes index entries whose composite id is no longer produced by the
    /// current snapshot, so removed messages do not leave orphaned vectors.
    async fn delete_orphaned_vectors(
        &self,
        records: &[VectorRecord],
    ) -> Result<usize, ReindexError> {
        let current_ids: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();

        let existing_ids = self
            .vector_index
            .list_ids()
            .await
            .map_err(|e| ReindexError::IndexError(e.to_string()))?;

        let stale: Vec<String> = existing_ids
            .into_iter()
            .filter(|id| !current_ids.contains(id.as_str()))
            .collect();

        if !stale.is_empty() {
            self.vector_index
                .delete(&stale)
                .await
                .map_err(|e| ReindexError::IndexError(e.to_string()))?;
        }

        Ok(stale.len())
    }
}

fn to_vector_record(chunk: &EmbeddedChunk) -> VectorRecord {
    let metadata = &chunk.metadata;

    let raw = json!({
        "text": chunk.text,
        "id": metadata.message_id.to_string(),
        "channel_id": metadata.channel_id.to_string(),
        "user_id": metadata.user_id.map(|id| id.to_string()),
        "user_name": metadata.user_name,
        "parent_id": metadata.parent_id.map(|id| id.to_string()),
        "created_at": metadata.created_at.to_rfc3339(),
        "chunk_index": metadata.chunk_index,
        "total_chunks": metadata.total_chunks,
    });

    let raw_map = match raw {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    VectorRecord {
        id: metadata.vector_id(),
        values: chunk.embedding.clone(),
        metadata: clean_metadata(raw_map),
    }
}

/// The index's metadata schema forbids nulls and heterogeneous arrays: null
/// values are dropped and array elements coerced to strings.
fn clean_metadata(metadata: Map<String, Value>) -> Map<String, Value> {
    metadata
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| match value {
            Value::Array(items) => {
                let coerced = items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => Value::String(s),
                        other => Value::String(other.to_string()),
                    })
                    .collect();
                (key, Value::Array(coerced))
            }
            other => (key, other),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pgvector::Vector;
    use uuid::Uuid;

    use super::*;
    use crate::application::ports::embedding_provider::EmbeddingProviderError;
    use crate::application::ports::vector_index::{MetadataFilter, VectorIndexError, VectorMatch};
    use crate::domain::entities::{ChatMessage, MessageBody};
    use crate::domain::repositories::message_repository::{
        MessageRepositoryError, MessageWithAuthor, NewChatMessage,
    };

    struct FixedMessageRepository {
        messages: Vec<MessageWithAuthor>,
    }

    #[async_trait]
    impl MessageRepository for FixedMessageRepository {
        async fn insert(
            &self,
            _new_message: NewChatMessage,
        ) -> Result<ChatMessage, MessageRepositoryError> {
            unimplemented!("not used by the reindex job")
        }

        async fn list_all_with_authors(
            &self,
        ) -> Result<Vec<MessageWithAuthor>, MessageRepositoryError> {
            Ok(self.messages.clone())
        }

        async fn increment_reply_count(
            &self,
            _message_id: Uuid,
        ) -> Result<(), MessageRepositoryError> {
            unimplemented!("not used by the reindex job")
        }
    }

    struct FixedEmbeddingProvider;

    #[async_trait]
    impl EmbeddingProvider for FixedEmbeddingProvider {
        async fn embed(&self, _text: &str) -> Result<Vector, EmbeddingProviderError> {
            Ok(Vector::from(vec![0.1, 0.2, 0.3]))
        }

        fn embedding_dimension(&self) -> usize {
            3
        }
    }

    /// Mock index with an exhaustive listing, so reconciliation can be
    /// asserted exactly.
    struct InMemoryVectorIndex {
        records: Mutex<HashMap<String, VectorRecord>>,
    }

    impl InMemoryVectorIndex {
        fn with_ids(ids: &[&str]) -> Self {
            let records = ids
                .iter()
                .map(|id| {
                    (
                        id.to_string(),
                        VectorRecord {
                            id: id.to_string(),
                            values: Vector::from(vec![0.0, 0.0, 0.0]),
                            metadata: Map::new(),
                        },
                    )
                })
                .collect();
            Self {
                records: Mutex::new(records),
            }
        }
    }

    #[async_trait]
    impl VectorIndex for InMemoryVectorIndex {
        async fn upsert(&self, records: &[VectorRecord]) -> Result<(), VectorIndexError> {
            let mut guard = self.records.lock().unwrap();
            for record in records {
                guard.insert(record.id.clone(), record.clone());
            }
            Ok(())
        }

        async fn query(
            &self,
            _vector: &Vector,
            _top_k: usize,
            _filter: Option<&MetadataFilter>,
        ) -> Result<Vec<VectorMatch>, VectorIndexError> {
            Ok(Vec::new())
        }

        async fn delete(&self, ids: &[String]) -> Result<(), VectorIndexError> {
            let mut guard = self.records.lock().unwrap();
            for id in ids {
                guard.remove(id);
            }
            Ok(())
        }

        async fn list_ids(&self) -> Result<Vec<String>, VectorIndexError> {
            Ok(self.records.lock().unwrap().keys().cloned().collect())
        }
    }

    fn seeded_message(text: &str, author: &str) -> MessageWithAuthor {
        MessageWithAuthor {
            message: ChatMessage::new(
                Uuid::new_v4(),
                Some(Uuid::new_v4()),
                None,
                MessageBody::text_only(text),
            ),
            author_name: Some(author.to_string()),
        }
    }

    #[tokio::test]
    async fn test_reconciliation_leaves_exactly_the_current_snapshot() {
        let messages = vec![
            seeded_message("I love durians and mangoes.", "bob"),
            seeded_message("Standup moved to ten. Please update the calendar.", "alice"),
        ];

        let expected_ids: HashSet<String> = messages
            .iter()
            .map(|m| format!("{}-0", m.message.id()))
            .collect();

        let index = Arc::new(InMemoryVectorIndex::with_ids(&["stale-0", "stale-1"]));
        let use_case = ReindexMessagesUseCase::new(
            Arc::new(FixedMessageRepository { messages }),
            Arc::new(FixedEmbeddingProvider),
            index.clone(),
        );

        let summary = use_case.execute().await.unwrap();

        assert_eq!(summary.message_count, 2);
        assert_eq!(summary.vector_count, 2);
        assert_eq!(summary.deleted_count, 2);

        let remaining: HashSet<String> = index.list_ids().await.unwrap().into_iter().collect();
        assert_eq!(remaining, expected_ids);
    }

    #[tokio::test]
    async fn test_empty_table_clears_the_index() {
        let index = Arc::new(InMemoryVectorIndex::with_ids(&["orphan-0"]));
        let use_case = ReindexMessagesUseCase::new(
            Arc::new(FixedMessageRepository { messages: vec![] }),
            Arc::new(FixedEmbeddingProvider),
            index.clone(),
        );

        let summary = use_case.execute().await.unwrap();

        assert_eq!(summary.vector_count, 0);
        assert_eq!(summary.deleted_count, 1);
        assert!(index.list_ids().await.unwrap().is_empty());
    }

    #[test]
    fn test_clean_metadata_drops_nulls() {
        let mut raw = Map::new();
        raw.insert("user_name".to_string(), json!("bob"));
        raw.insert("parent_id".to_string(), Value::Null);

        let cleaned = clean_metadata(raw);

        assert_eq!(cleaned.get("user_name"), Some(&json!("bob")));
        assert!(!cleaned.contains_key("parent_id"));
    }

    #[test]
    fn test_clean_metadata_coerces_arrays_to_strings() {
        let mut raw = Map::new();
        raw.insert("tags".to_string(), json!(["a", 1, true]));

        let cleaned = clean_metadata(raw);

        assert_eq!(cleaned.get("tags"), Some(&json!(["a", "1", "true"])));
    }

    #[test]
    fn test_vector_record_metadata_has_no_nulls() {
        let message = seeded_message("Hello world.", "bob");
        let chunks = MessageChunker::default().chunk_message(&message);
        let embedded = EmbeddedChunk {
            text: chunks[0].text.clone(),
            embedding: Vector::from(vec![0.0, 0.0, 0.0]),
            metadata: chunks[0].metadata.clone(),
        };

        let record = to_vector_record(&embedded);

        // Root message: parent_id is None and must not appear as null.
        assert!(!record.metadata.contains_key("parent_id"));
        assert_eq!(record.metadata.get("user_name"), Some(&json!("bob")));
        assert_eq!(record.id, format!("{}-0", message.message.id()));
    }
}
