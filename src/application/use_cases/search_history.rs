use std::sync::Arc;

use crate::application::services::retrieval_service::ContextSnippet;
use crate::application::services::{AnswerService, RetrievalService};

const DEFAULT_MAX_RESULTS: usize = 5;

#[derive(Debug)]
pub enum SearchHistoryError {
    ValidationError(String),
    RetrievalError(String),
    SynthesisError(String),
}

impl std::fmt::Display for SearchHistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchHistoryError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            SearchHistoryError::RetrievalError(msg) => write!(f, "Retrieval error: {}", msg),
            SearchHistoryError::SynthesisError(msg) => write!(f, "Synthesis error: {}", msg),
        }
    }
}

impl std::error::Error for SearchHistoryError {}

#[derive(Debug, Clone)]
pub struct SearchHistoryRequest {
    pub query: String,
    pub max_results: Option<usize>,
}

/// Synthesized answer plus the snippets it was grounded on.
#[derive(Debug, Clone)]
pub struct ChatbotAnswer {
    pub answer: String,
    pub context: Vec<ContextSnippet>,
}

/// General Q&A over the whole indexed chat history.
pub struct SearchHistoryUseCase {
    retrieval_service: Arc<RetrievalService>,
    answer_service: Arc<AnswerService>,
}

impl SearchHistoryUseCase {
    pub fn new(retrieval_service: Arc<RetrievalService>, answer_service: Arc<AnswerService>) -> Self {
        Self {
            retrieval_service,
            answer_service,
        }
    }

    pub async fn execute(
        &self,
        request: SearchHistoryRequest,
    ) -> Result<ChatbotAnswer, SearchHistoryError> {
        if request.query.trim().is_empty() {
            return Err(SearchHistoryError::ValidationError(
                "Query cannot be empty".to_string(),
            ));
        }

        let top_k = request.max_results.unwrap_or(DEFAULT_MAX_RESULTS);

        let snippets = self
            .retrieval_service
            .search(&request.query, top_k, None)
            .await
            .map_err(|e| SearchHistoryError::RetrievalError(e.to_string()))?;

        let answer = self
            .answer_service
            .answer_from_history(&request.query, &snippets)
            .await
            .map_err(|e| SearchHistoryError::SynthesisError(e.to_string()))?;

        Ok(ChatbotAnswer {
            answer,
            context: snippets,
        })
    }
}
