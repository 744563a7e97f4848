use async_trait::async_trait;
use pgvector::Vector;
use reqwest::{Client, Error as ReqwestError};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::application::ports::EmbeddingProvider;
use crate::application::ports::embedding_provider::EmbeddingProviderError;

/// text-embedding-3-large output width.
pub const EMBEDDING_DIMENSION: usize = 3072;

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "text-embedding-3-large";

#[derive(Serialize)]
struct EmbeddingsApiRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingsApiResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingsConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for OpenAiEmbeddingsConfig {
    fn default() -> Self {
        Self {
            api_base: env::var("OPENAI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            model: env::var("OPENAI_EMBEDDING_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            timeout_secs: 30,
        }
    }
}

/// Client for the OpenAI embeddings endpoint. Failures are not retried;
/// they propagate to the caller.
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingsClient {
    client: Client,
    config: OpenAiEmbeddingsConfig,
}

impl OpenAiEmbeddingsClient {
    pub fn new(config: OpenAiEmbeddingsConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ReqwestError> {
        Self::new(OpenAiEmbeddingsConfig::default())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingsClient {
    async fn embed(&self, text: &str) -> Result<Vector, EmbeddingProviderError> {
        if text.trim().is_empty() {
            return Err(EmbeddingProviderError::InvalidInput(
                "Cannot embed empty text".to_string(),
            ));
        }

        let request = EmbeddingsApiRequest {
            model: &self.config.model,
            input: text,
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.config.api_base))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbeddingProviderError::NetworkError(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingProviderError::ApiError(format!(
                "Embeddings request failed with {}: {}",
                status, body
            )));
        }

        let parsed = response
            .json::<EmbeddingsApiResponse>()
            .await
            .map_err(|e| EmbeddingProviderError::ApiError(e.to_string()))?;

        let first = parsed.data.into_iter().next().ok_or_else(|| {
            EmbeddingProviderError::ApiError("No embeddings returned".to_string())
        })?;

        Ok(Vector::from(first.embedding))
    }

    fn embedding_dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }
}
