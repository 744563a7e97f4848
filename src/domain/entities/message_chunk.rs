use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Provenance of a chunk, stored alongside its vector in the index so that
/// search results can be rendered without a round trip to the message table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub message_id: Uuid,
    pub channel_id: Uuid,
    pub user_id: Option<Uuid>,
    pub user_name: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

impl ChunkMetadata {
    /// Composite id used in the vector index: `{message_id}-{chunk_index}`.
    pub fn vector_id(&self) -> String {
        format!("{}-{}", self.message_id, self.chunk_index)
    }
}

/// A sentence-bounded slice of one chat message, ready for embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageChunk {
    pub text: String,
    pub metadata: ChunkMetadata,
}

impl MessageChunk {
    pub fn vector_id(&self) -> String {
        self.metadata.vector_id()
    }
}

/// A chunk paired with its embedding. Lives only in the external vector
/// index; never written to the relational store.
#[derive(Debug, Clone)]
pub struct EmbeddedChunk {
    pub text: String,
    pub embedding: Vector,
    pub metadata: ChunkMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_id_format() {
        let message_id = Uuid::new_v4();
        let chunk = MessageChunk {
            text: "some text".to_string(),
            metadata: ChunkMetadata {
                message_id,
                channel_id: Uuid::new_v4(),
                user_id: None,
                user_name: "alice".to_string(),
                parent_id: None,
                created_at: Utc::now(),
                chunk_index: 2,
                total_chunks: 3,
            },
        };

        assert_eq!(chunk.vector_id(), format!("{}-2", message_id));
    }
}
