use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::application::ports::ChatCompletionProvider;
use crate::application::ports::chat_completion::{ChatCompletionError, CompletionRequest};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";

#[derive(Serialize)]
struct ChatApiRequest<'a> {
    model: &'a str,
    messages: Vec<ChatApiMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatApiResponse {
    choices: Vec<ChatApiChoice>,
}

#[derive(Deserialize)]
struct ChatApiChoice {
    message: ChatApiResponseMessage,
}

#[derive(Deserialize)]
struct ChatApiResponseMessage {
    content: String,
}

#[derive(Debug, Clone)]
pub struct OpenAiCompletionsConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for OpenAiCompletionsConfig {
    fn default() -> Self {
        Self {
            api_base: env::var("OPENAI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            model: env::var("OPENAI_CHAT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            timeout_secs: 60,
        }
    }
}

/// Client for the OpenAI chat-completions endpoint. One request per call,
/// no retry.
#[derive(Debug, Clone)]
pub struct OpenAiCompletionsClient {
    client: Client,
    config: OpenAiCompletionsConfig,
}

impl OpenAiCompletionsClient {
    pub fn new(config: OpenAiCompletionsConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ReqwestError> {
        Self::new(OpenAiCompletionsConfig::default())
    }
}

#[async_trait]
impl ChatCompletionProvider for OpenAiCompletionsClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ChatCompletionError> {
        let api_request = ChatApiRequest {
            model: &self.config.model,
            messages: vec![
                ChatApiMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatApiMessage {
                    role: "user",
                    content: &request.user_message,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .bearer_auth(&self.config.api_key)
            .json(&api_request)
            .send()
            .await
            .map_err(|e| ChatCompletionError::NetworkError(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatCompletionError::ApiError(format!(
                "Completion request failed with {}: {}",
                status, body
            )));
        }

        let parsed = response
            .json::<ChatApiResponse>()
            .await
            .map_err(|e| ChatCompletionError::ApiError(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ChatCompletionError::EmptyResponse)
    }
}
