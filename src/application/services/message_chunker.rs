use std::sync::OnceLock;

use regex::Regex;

use crate::domain::entities::{ChunkMetadata, MessageChunk};
use crate::domain::repositories::MessageWithAuthor;

const DEFAULT_MAX_CHUNK_SIZE: usize = 500;
const UNKNOWN_AUTHOR: &str = "Unknown User";

fn html_tags() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid pattern"))
}

fn markdown_links() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid pattern"))
}

fn markdown_formatting() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[*_~`]+").expect("valid pattern"))
}

fn whitespace_runs() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("valid pattern"))
}

fn urls() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"https?://\S+").expect("valid pattern"))
}

fn sentence_boundaries() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^.!?]+[.!?]+").expect("valid pattern"))
}

/// Turns chat messages into cleaned, sentence-bounded chunks for embedding.
#[derive(Debug, Clone)]
pub struct MessageChunker {
    max_chunk_size: usize,
}

impl Default for MessageChunker {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
        }
    }
}

impl MessageChunker {
    pub fn new(max_chunk_size: usize) -> Self {
        Self { max_chunk_size }
    }

    /// Strips HTML tags, markdown formatting and URLs, collapsing whitespace
    /// so only plain prose reaches the embedding model.
    pub fn clean_text(&self, text: &str) -> String {
        let cleaned = html_tags().replace_all(text, "");
        let cleaned = markdown_links().replace_all(&cleaned, "$1");
        let cleaned = markdown_formatting().replace_all(&cleaned, "");
        let cleaned = whitespace_runs().replace_all(&cleaned, " ");
        let cleaned = urls().replace_all(&cleaned, "");

        cleaned.trim().to_string()
    }

    /// Greedy sentence accumulation: whole sentences are appended until the
    /// next one would exceed the limit, then a new chunk starts. A single
    /// sentence longer than the limit is kept as one oversized chunk.
    pub fn chunk_text(&self, text: &str) -> Vec<String> {
        let sentences: Vec<&str> = {
            let matched: Vec<&str> = sentence_boundaries()
                .find_iter(text)
                .map(|m| m.as_str())
                .collect();

            if matched.is_empty() {
                vec![text]
            } else {
                matched
            }
        };

        let mut chunks = Vec::new();
        let mut current_chunk = String::new();

        for sentence in sentences {
            if current_chunk.len() + sentence.len() <= self.max_chunk_size {
                current_chunk.push_str(sentence);
            } else {
                if !current_chunk.is_empty() {
                    chunks.push(current_chunk.trim().to_string());
                }
                current_chunk = sentence.to_string();
            }
        }
        if !current_chunk.trim().is_empty() {
            chunks.push(current_chunk.trim().to_string());
        }

        chunks
    }

    /// Cleans and chunks one message, attaching provenance metadata to each
    /// chunk. Messages whose text cleans down to nothing yield no chunks.
    pub fn chunk_message(&self, message: &MessageWithAuthor) -> Vec<MessageChunk> {
        let cleaned = self.clean_text(message.message.text());
        let pieces = self.chunk_text(&cleaned);
        let total_chunks = pieces.len();

        let user_name = message
            .author_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

        pieces
            .into_iter()
            .enumerate()
            .map(|(chunk_index, text)| MessageChunk {
                text,
                metadata: ChunkMetadata {
                    message_id: message.message.id(),
                    channel_id: message.message.channel_id(),
                    user_id: message.message.user_id(),
                    user_name: user_name.clone(),
                    parent_id: message.message.parent_id(),
                    created_at: message.message.created_at(),
                    chunk_index,
                    total_chunks,
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::entities::{ChatMessage, MessageBody};

    fn message_with_author(text: &str, author: Option<&str>) -> MessageWithAuthor {
        MessageWithAuthor {
            message: ChatMessage::new(
                Uuid::new_v4(),
                Some(Uuid::new_v4()),
                None,
                MessageBody::text_only(text),
            ),
            author_name: author.map(|a| a.to_string()),
        }
    }

    #[test]
    fn test_clean_strips_html_and_markdown() {
        let chunker = MessageChunker::default();

        assert_eq!(
            chunker.clean_text("<b>bold</b> and *starred* and `code`"),
            "bold and starred and code"
        );
        assert_eq!(
            chunker.clean_text("see [the docs](https://example.com/docs) here"),
            "see the docs here"
        );
    }

    #[test]
    fn test_clean_strips_urls_and_collapses_whitespace() {
        let chunker = MessageChunker::default();

        let cleaned = chunker.clean_text("look at\n\nhttps://example.com/page now");
        assert!(!cleaned.contains("https://"));
        assert!(cleaned.starts_with("look at"));
        assert!(!chunker.clean_text("a\n\n\tb").contains('\n'));
    }

    #[test]
    fn test_chunks_stay_within_limit() {
        let chunker = MessageChunker::new(50);
        let text = "First sentence here. Second sentence here. Third sentence here. Fourth one.";

        let chunks = chunker.chunk_text(text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 50, "chunk too long: {:?}", chunk);
        }
    }

    #[test]
    fn test_chunking_preserves_sentence_sequence() {
        let chunker = MessageChunker::new(40);
        let text = "Alpha is first. Beta follows alpha. Gamma is third. Delta ends it.";

        let chunks = chunker.chunk_text(text);
        let rejoined: String = chunks.join("");
        let original_compact: String = text.split_whitespace().collect();
        let rejoined_compact: String = rejoined.split_whitespace().collect();

        assert_eq!(rejoined_compact, original_compact);
    }

    #[test]
    fn test_oversized_sentence_is_kept_whole() {
        let chunker = MessageChunker::new(20);
        let long_sentence = "This single sentence is far longer than the limit allows.";

        let chunks = chunker.chunk_text(long_sentence);

        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].len() > 20);
    }

    #[test]
    fn test_unterminated_text_is_single_sentence() {
        let chunker = MessageChunker::default();

        let chunks = chunker.chunk_text("no punctuation at all");

        assert_eq!(chunks, vec!["no punctuation at all".to_string()]);
    }

    #[test]
    fn test_chunk_message_attaches_metadata() {
        let chunker = MessageChunker::default();
        let message = message_with_author("I love durians and mangoes.", Some("bob"));

        let chunks = chunker.chunk_message(&message);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.user_name, "bob");
        assert_eq!(chunks[0].metadata.chunk_index, 0);
        assert_eq!(chunks[0].metadata.total_chunks, 1);
        assert_eq!(
            chunks[0].vector_id(),
            format!("{}-0", message.message.id())
        );
    }

    #[test]
    fn test_authorless_message_uses_fallback_name() {
        let chunker = MessageChunker::default();
        let message = message_with_author("Some text here.", None);

        let chunks = chunker.chunk_message(&message);

        assert_eq!(chunks[0].metadata.user_name, "Unknown User");
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let chunker = MessageChunker::default();
        let message = message_with_author("   ", None);

        assert!(chunker.chunk_message(&message).is_empty());
    }
}
