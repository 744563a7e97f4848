use async_trait::async_trait;
use pgvector::Vector;
use reqwest::{Client, Error as ReqwestError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::env;
use std::time::Duration;

use crate::application::ports::VectorIndex;
use crate::application::ports::vector_index::{
    MetadataFilter, VectorIndexError, VectorMatch, VectorRecord,
};

const LIST_PAGE_LIMIT: usize = 100;

#[derive(Serialize)]
struct UpsertApiRequest {
    vectors: Vec<UpsertApiVector>,
}

#[derive(Serialize)]
struct UpsertApiVector {
    id: String,
    values: Vec<f32>,
    metadata: Map<String, Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryApiRequest {
    vector: Vec<f32>,
    top_k: usize,
    include_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Value>,
}

#[derive(Deserialize)]
struct QueryApiResponse {
    #[serde(default)]
    matches: Vec<QueryApiMatch>,
}

#[derive(Deserialize)]
struct QueryApiMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

#[derive(Serialize)]
struct DeleteApiRequest<'a> {
    ids: &'a [String],
}

#[derive(Deserialize)]
struct ListApiResponse {
    #[serde(default)]
    vectors: Vec<ListApiVector>,
    #[serde(default)]
    pagination: Option<ListApiPagination>,
}

#[derive(Deserialize)]
struct ListApiVector {
    id: String,
}

#[derive(Deserialize)]
struct ListApiPagination {
    next: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PineconeConfig {
    pub api_key: String,
    pub index_host: String,
    pub timeout_secs: u64,
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            api_key: env::var("VECTOR_INDEX_API_KEY").unwrap_or_default(),
            index_host: env::var("VECTOR_INDEX_HOST").unwrap_or_default(),
            timeout_secs: 30,
        }
    }
}

/// Client for a Pinecone serverless index over its data-plane REST API.
#[derive(Debug, Clone)]
pub struct PineconeIndexClient {
    client: Client,
    config: PineconeConfig,
}

impl PineconeIndexClient {
    pub fn new(config: PineconeConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ReqwestError> {
        Self::new(PineconeConfig::default())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.index_host.trim_end_matches('/'), path)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, VectorIndexError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(VectorIndexError::ApiError(format!(
            "Index request failed with {}: {}",
            status, body
        )))
    }
}

#[async_trait]
impl VectorIndex for PineconeIndexClient {
    async fn upsert(&self, records: &[VectorRecord]) -> Result<(), VectorIndexError> {
        if records.is_empty() {
            return Ok(());
        }

        let request = UpsertApiRequest {
            vectors: records
                .iter()
                .map(|record| UpsertApiVector {
                    id: record.id.clone(),
                    values: record.values.clone().into(),
                    metadata: record.metadata.clone(),
                })
                .collect(),
        };

        let response = self
            .client
            .post(self.endpoint("/vectors/upsert"))
            .header("Api-Key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| VectorIndexError::NetworkError(e.without_url().to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn query(
        &self,
        vector: &Vector,
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<VectorMatch>, VectorIndexError> {
        let request = QueryApiRequest {
            vector: vector.clone().into(),
            top_k,
            include_metadata: true,
            filter: filter.map(|f| json!({ (f.field.as_str()): { "$eq": f.value.clone() } })),
        };

        let response = self
            .client
            .post(self.endpoint("/query"))
            .header("Api-Key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| VectorIndexError::NetworkError(e.without_url().to_string()))?;

        let parsed = Self::check_status(response)
            .await?
            .json::<QueryApiResponse>()
            .await
            .map_err(|e| VectorIndexError::ApiError(e.to_string()))?;

        Ok(parsed
            .matches
            .into_iter()
            .map(|m| VectorMatch {
                id: m.id,
                score: m.score,
                metadata: m.metadata.unwrap_or_default(),
            })
            .collect())
    }

    async fn delete(&self, ids: &[String]) -> Result<(), VectorIndexError> {
        if ids.is_empty() {
            return Ok(());
        }

        let response = self
            .client
            .post(self.endpoint("/vectors/delete"))
            .header("Api-Key", &self.config.api_key)
            .json(&DeleteApiRequest { ids })
            .send()
            .await
            .map_err(|e| VectorIndexError::NetworkError(e.without_url().to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn list_ids(&self) -> Result<Vec<String>, VectorIndexError> {
        let mut ids = Vec::new();
        let mut pagination_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(self.endpoint("/vectors/list"))
                .header("Api-Key", &self.config.api_key)
                .query(&[("limit", LIST_PAGE_LIMIT.to_string())]);

            if let Some(token) = &pagination_token {
                request = request.query(&[("paginationToken", token)]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| VectorIndexError::NetworkError(e.without_url().to_string()))?;

            let page = Self::check_status(response)
                .await?
                .json::<ListApiResponse>()
                .await
                .map_err(|e| VectorIndexError::ApiError(e.to_string()))?;

            ids.extend(page.vectors.into_iter().map(|v| v.id));

            match page.pagination.and_then(|p| p.next) {
                Some(next) => pagination_token = Some(next),
                None => break,
            }
        }

        Ok(ids)
    }
}
