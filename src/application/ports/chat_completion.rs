use async_trait::async_trait;

#[derive(Debug)]
pub enum ChatCompletionError {
    NetworkError(String),
    ApiError(String),
    EmptyResponse,
}

impl std::fmt::Display for ChatCompletionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatCompletionError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            ChatCompletionError::ApiError(msg) => write!(f, "API error: {}", msg),
            ChatCompletionError::EmptyResponse => write!(f, "Model returned no choices"),
        }
    }
}

impl std::error::Error for ChatCompletionError {}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_message: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// External chat-completion model. Returns the generated text verbatim; no
/// retry on failure.
#[async_trait]
pub trait ChatCompletionProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ChatCompletionError>;
}
