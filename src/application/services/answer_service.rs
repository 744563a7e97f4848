use std::sync::Arc;

use crate::application::ports::ChatCompletionProvider;
use crate::application::ports::chat_completion::CompletionRequest;
use crate::application::services::retrieval_service::ContextSnippet;

/// Open Q&A over history gets a higher temperature; style imitation is kept
/// more deterministic.
const HISTORY_TEMPERATURE: f32 = 0.7;
const IMITATION_TEMPERATURE: f32 = 0.3;
const MAX_ANSWER_TOKENS: u32 = 500;

#[derive(Debug)]
pub enum AnswerError {
    EmptyContext,
    CompletionError(String),
}

impl std::fmt::Display for AnswerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerError::EmptyContext => {
                write!(f, "No indexed chat history available to answer from")
            }
            AnswerError::CompletionError(msg) => write!(f, "Completion error: {}", msg),
        }
    }
}

impl std::error::Error for AnswerError {}

/// Builds one of two fixed prompt templates around retrieved context and
/// calls the completion model. The generated text is returned verbatim.
pub struct AnswerService {
    completion_provider: Arc<dyn ChatCompletionProvider>,
}

impl AnswerService {
    pub fn new(completion_provider: Arc<dyn ChatCompletionProvider>) -> Self {
        Self { completion_provider }
    }

    pub async fn answer_from_history(
        &self,
        query: &str,
        snippets: &[ContextSnippet],
    ) -> Result<String, AnswerError> {
        if snippets.is_empty() {
            return Err(AnswerError::EmptyContext);
        }

        let request = CompletionRequest {
            system_prompt: build_history_prompt(snippets),
            user_message: query.to_string(),
            temperature: HISTORY_TEMPERATURE,
            max_tokens: MAX_ANSWER_TOKENS,
        };

        self.completion_provider
            .complete(request)
            .await
            .map_err(|e| AnswerError::CompletionError(e.to_string()))
    }

    pub async fn answer_in_user_style(
        &self,
        query: &str,
        user_name: &str,
        snippets: &[ContextSnippet],
    ) -> Result<String, AnswerError> {
        if snippets.is_empty() {
            return Err(AnswerError::EmptyContext);
        }

        let request = CompletionRequest {
            system_prompt: build_imitation_prompt(user_name, snippets),
            user_message: query.to_string(),
            temperature: IMITATION_TEMPERATURE,
            max_tokens: MAX_ANSWER_TOKENS,
        };

        self.completion_provider
            .complete(request)
            .await
            .map_err(|e| AnswerError::CompletionError(e.to_string()))
    }
}

fn build_history_prompt(snippets: &[ContextSnippet]) -> String {
    let context = snippets
        .iter()
        .map(|snippet| {
            format!(
                "[{}]: {}",
                snippet.user_name.as_deref().unwrap_or("Unknown User"),
                snippet.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are a helpful AI assistant with access to chat history.\n\
         Use the following relevant chat messages as context to answer the user's question.\n\
         Only use information from the provided context. If you can't find relevant information, say so.\n\
         When referring to messages, include the user's name if available.\n\
         \n\
         Context:\n\
         {}",
        context
    )
}

fn build_imitation_prompt(user_name: &str, snippets: &[ContextSnippet]) -> String {
    let context = snippets
        .iter()
        .map(|snippet| snippet.text.clone())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are an AI that mimics {name}'s communication style and knowledge.\n\
         I will provide you with examples of their past messages, and you should respond to the query in their style.\n\
         Limit your response to under 5 sentences.\n\
         Use their past messages as examples of their:\n\
         1. Tone and formality level\n\
         2. Typical sentence structure and length\n\
         3. Common phrases or expressions they use\n\
         4. How they format their messages\n\
         5. Their personality traits that come through in their writing\n\
         \n\
         Here are examples of their past messages:\n\
         \n\
         {context}\n\
         \n\
         Respond to the query in a way that authentically matches their communication style.\n\
         If you don't have enough context to mimic their style or knowledge, just do your best.",
        name = user_name,
        context = context
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(text: &str, user: Option<&str>) -> ContextSnippet {
        ContextSnippet {
            text: text.to_string(),
            user_name: user.map(|u| u.to_string()),
            created_at: None,
            score: 0.9,
        }
    }

    #[test]
    fn test_history_prompt_names_authors() {
        let prompt = build_history_prompt(&[
            snippet("hello there", Some("alice")),
            snippet("general kenobi", None),
        ]);

        assert!(prompt.contains("[alice]: hello there"));
        assert!(prompt.contains("[Unknown User]: general kenobi"));
    }

    #[test]
    fn test_imitation_prompt_targets_user() {
        let prompt = build_imitation_prompt("bob", &[snippet("durians are great", Some("bob"))]);

        assert!(prompt.starts_with("You are an AI that mimics bob's"));
        assert!(prompt.contains("durians are great"));
    }

    #[test]
    fn test_imitation_runs_cooler_than_history() {
        assert!(IMITATION_TEMPERATURE < HISTORY_TEMPERATURE);
    }
}
