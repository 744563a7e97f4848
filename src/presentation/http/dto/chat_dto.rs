use serde::{Deserialize, Serialize};

use crate::application::services::retrieval_service::ContextSnippet;
use crate::application::use_cases::search_history::ChatbotAnswer;

/// Request fields are optional so that missing values surface as 400s with
/// explicit messages instead of deserialization failures.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistoryRequestDto {
    pub query: Option<String>,
    pub max_results: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserChatRequestDto {
    pub query: Option<String>,
    pub user_id: Option<String>,
    pub max_results: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ChatbotAnswerDto {
    pub answer: String,
    pub context: Vec<ContextSnippetDto>,
}

#[derive(Debug, Serialize)]
pub struct ContextSnippetDto {
    pub text: String,
    pub user_name: Option<String>,
    pub created_at: Option<String>,
    pub score: f32,
}

impl From<ContextSnippet> for ContextSnippetDto {
    fn from(snippet: ContextSnippet) -> Self {
        Self {
            text: snippet.text,
            user_name: snippet.user_name,
            created_at: snippet.created_at,
            score: snippet.score,
        }
    }
}

impl From<ChatbotAnswer> for ChatbotAnswerDto {
    fn from(answer: ChatbotAnswer) -> Self {
        Self {
            answer: answer.answer,
            context: answer
                .context
                .into_iter()
                .map(ContextSnippetDto::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LivenessDto {
    pub status: String,
    pub version: String,
}
