//! OpenAI-compatible analysis provider.
//!
//! Two calls per batch: a chat completion that condenses the user's
//! messages into comma-separated trait lists, then an embeddings call on
//! that summary. Retrying is left to the caller; each call is bounded by the
//! configured request timeout.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use affinity_core::config::AnalysisConfig;
use affinity_core::errors::{AffinityResult, AnalysisError};
use affinity_core::models::{AnalysisOutput, Message};
use affinity_core::traits::IAnalysisProvider;

use crate::prompt::{build_analysis_prompt, SYSTEM_INSTRUCTION};

pub struct ApiAnalysisProvider {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    endpoint: String,
    api_key: String,
    chat_model: String,
    embedding_model: String,
    dimensions: usize,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
    encoding_format: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

impl ApiAnalysisProvider {
    /// Build from config, reading the key from `config.api_key_env`.
    pub fn from_config(config: &AnalysisConfig) -> AffinityResult<Self> {
        let api_key =
            std::env::var(&config.api_key_env).map_err(|_| AnalysisError::ProviderUnavailable {
                provider: format!("api (missing {})", config.api_key_env),
            })?;
        Self::with_api_key(config, api_key)
    }

    /// Build from config with an explicit key.
    pub fn with_api_key(config: &AnalysisConfig, api_key: String) -> AffinityResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AnalysisError::RequestFailed {
                reason: format!("client error: {e}"),
            })?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| AnalysisError::RequestFailed {
                reason: format!("runtime error: {e}"),
            })?;

        Ok(Self {
            client,
            runtime,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
            dimensions: config.dimensions,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// POST a JSON body and decode the JSON response.
    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> AffinityResult<R> {
        let url = format!("{}/{path}", self.endpoint);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AnalysisError::RequestFailed {
                reason: format!("HTTP error: {e}"),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::RequestFailed {
                reason: format!("API returned {status}: {body}"),
            }
            .into());
        }

        response
            .json()
            .await
            .map_err(|e| {
                AnalysisError::InvalidResponse {
                    reason: format!("JSON parse error: {e}"),
                }
                .into()
            })
    }

    async fn summarize(&self, messages: &[Message]) -> AffinityResult<String> {
        let prompt = build_analysis_prompt(messages);
        let request = ChatRequest {
            model: &self.chat_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_INSTRUCTION,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response: ChatResponse = self.post_json("chat/completions", &request).await?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AnalysisError::InvalidResponse {
                    reason: "empty completion".to_string(),
                }
                .into()
            })
    }

    async fn embed(&self, text: &str) -> AffinityResult<Vec<f32>> {
        let request = EmbedRequest {
            model: &self.embedding_model,
            input: text,
            encoding_format: "float",
        };
        let response: EmbedResponse = self.post_json("embeddings", &request).await?;
        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| AnalysisError::InvalidResponse {
                reason: "empty embedding response".to_string(),
            })?;

        if embedding.len() != self.dimensions {
            return Err(AnalysisError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.len(),
            }
            .into());
        }
        Ok(embedding)
    }
}

impl IAnalysisProvider for ApiAnalysisProvider {
    fn analyze(&self, messages: &[Message]) -> AffinityResult<AnalysisOutput> {
        if messages.is_empty() {
            return Err(AnalysisError::EmptyBatch.into());
        }
        self.runtime.block_on(async {
            let analysis = self.summarize(messages).await?;
            debug!(chars = analysis.len(), "analysis summary received");
            let embedding = self.embed(&analysis).await?;
            Ok(AnalysisOutput {
                analysis,
                embedding,
            })
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.chat_model
    }
}
