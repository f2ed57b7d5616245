//! Ollama implementation of [`LlmClient`]: non-streaming `POST /api/generate`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use super::{GenerationError, LlmClient};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
    num_predict: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            num_predict: 300,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Answer generator backed by a local or remote Ollama server.
#[derive(Clone)]
pub struct OllamaLlmClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    options: GenerateOptions,
}

impl OllamaLlmClient {
    /// Fails when the HTTP client (with its request timeout) cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                error!(error = %e, "Failed to build Ollama HTTP client");
                transport(e)
            })?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            options: GenerateOptions::default(),
        })
    }

    /// Overrides the sampling temperature (default 0.7).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn transport(e: reqwest::Error) -> GenerationError {
    GenerationError::Transport(e.to_string())
}

#[async_trait]
impl LlmClient for OllamaLlmClient {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: self.options,
        };

        info!(url = %url, "Ollama generate request");
        let response = self.http.post(&url).json(&body).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %text, "Ollama generate request failed");
            return Err(GenerationError::Service {
                status: Some(status.as_u16()),
                message: text,
            });
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| GenerationError::Service {
            status: Some(status.as_u16()),
            message: format!("Malformed generate response: {}", e),
        })?;

        let answer = parsed.response.trim().to_string();
        if answer.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        info!(answer_len = answer.len(), "Ollama generate done");
        Ok(answer)
    }

    /// Readiness check: `GET /api/tags` must answer 200.
    #[instrument(skip(self))]
    async fn check_ready(&self) -> Result<(), GenerationError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self.http.get(&url).send().await.map_err(|e| {
            error!(url = %url, error = %e, "Couldn't connect to Ollama service");
            transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            info!(model = %self.model, "Ollama service detected and ready");
            Ok(())
        } else {
            error!(status = status.as_u16(), "Ollama service unavailable");
            Err(GenerationError::Service {
                status: Some(status.as_u16()),
                message: "Ollama service unavailable".to_string(),
            })
        }
    }
}
