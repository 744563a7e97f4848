use std::sync::Arc;

use uuid::Uuid;

use crate::application::services::{AnswerService, RetrievalService};
use crate::application::use_cases::search_history::ChatbotAnswer;
use crate::domain::repositories::UserRepository;

const DEFAULT_MAX_RESULTS: usize = 10;

#[derive(Debug)]
pub enum ImitateUserError {
    ValidationError(String),
    UserNotFound(Uuid),
    RepositoryError(String),
    RetrievalError(String),
    SynthesisError(String),
}

impl std::fmt::Display for ImitateUserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImitateUserError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ImitateUserError::UserNotFound(id) => write!(f, "User not found: {}", id),
            ImitateUserError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            ImitateUserError::RetrievalError(msg) => write!(f, "Retrieval error: {}", msg),
            ImitateUserError::SynthesisError(msg) => write!(f, "Synthesis error: {}", msg),
        }
    }
}

impl std::error::Error for ImitateUserError {}

#[derive(Debug, Clone)]
pub struct ImitateUserRequest {
    pub user_id: Uuid,
    pub query: String,
    pub max_results: Option<usize>,
}

/// Answers a query in one user's voice, grounded on that user's own indexed
/// messages only.
pub struct ImitateUserUseCase {
    user_repository: Arc<dyn UserRepository>,
    retrieval_service: Arc<RetrievalService>,
    answer_service: Arc<AnswerService>,
}

impl ImitateUserUseCase {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        retrieval_service: Arc<RetrievalService>,
        answer_service: Arc<AnswerService>,
    ) -> Self {
        Self {
            user_repository,
            retrieval_service,
            answer_service,
        }
    }

    pub async fn execute(
        &self,
        request: ImitateUserRequest,
    ) -> Result<ChatbotAnswer, ImitateUserError> {
        if request.query.trim().is_empty() {
            return Err(ImitateUserError::ValidationError(
                "Query cannot be empty".to_string(),
            ));
        }

        let user = self
            .user_repository
            .find_by_id(request.user_id)
            .await
            .map_err(|e| ImitateUserError::RepositoryError(e.to_string()))?
            .ok_or(ImitateUserError::UserNotFound(request.user_id))?;

        let top_k = request.max_results.unwrap_or(DEFAULT_MAX_RESULTS);

        let snippets = self
            .retrieval_service
            .search(&request.query, top_k, Some(request.user_id))
            .await
            .map_err(|e| ImitateUserError::RetrievalError(e.to_string()))?;

        let answer = self
            .answer_service
            .answer_in_user_style(&request.query, user.name(), &snippets)
            .await
            .map_err(|e| ImitateUserError::SynthesisError(e.to_string()))?;

        Ok(ChatbotAnswer {
            answer,
            context: snippets,
        })
    }
}
