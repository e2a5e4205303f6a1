//! OpenAI-compatible HTTP embedding provider.
//!
//! Implements [`VectorProvider`] against `POST {api_base}/embeddings`, one text per
//! request, asking for float encoding. No retries are attempted here.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ProviderError, VectorProvider};
use crate::config::EmbeddingConfig;

/// Longest error body carried inside a [`ProviderError::Status`].
const MAX_ERROR_BODY: usize = 512;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    encoding_format: &'static str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

pub struct OpenAiProvider {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
    timeout: Duration,
}

impl OpenAiProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .context("failed to build HTTP client")?;

        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_owned);

        tracing::info!(
            model = %config.model,
            api_base = %config.api_base,
            has_key = api_key.is_some(),
            "openai provider configured"
        );

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_owned(),
            api_key,
            model: config.model.clone(),
            timeout: config.timeout(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.api_base)
    }

    fn transport_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout {
                secs: self.timeout.as_secs(),
            }
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl VectorProvider for OpenAiProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;

        let payload = serde_json::to_vec(&EmbeddingRequest {
            model: &self.model,
            input: text,
            encoding_format: "float",
        })
        .map_err(|e| ProviderError::Malformed(format!("failed to encode request: {e}")))?;

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        parse_embedding_response(&body)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Map a non-success HTTP status to a [`ProviderError`].
fn classify_status(status: StatusCode, body: &[u8]) -> ProviderError {
    let mut text = String::from_utf8_lossy(body).into_owned();
    if text.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        ProviderError::Quota(text)
    } else {
        ProviderError::Status {
            status: status.as_u16(),
            body: text,
        }
    }
}

/// Extract the first embedding from an `/embeddings` response body.
fn parse_embedding_response(body: &[u8]) -> Result<Vec<f32>, ProviderError> {
    let parsed: EmbeddingResponse = serde_json::from_slice(body)
        .map_err(|e| ProviderError::Malformed(format!("failed to parse response: {e}")))?;

    let embedding = parsed
        .data
        .into_iter()
        .next()
        .map(|datum| datum.embedding)
        .ok_or_else(|| ProviderError::Malformed("response contained no embeddings".into()))?;

    if embedding.is_empty() {
        return Err(ProviderError::Malformed("embedding was empty".into()));
    }
    Ok(embedding)
}
