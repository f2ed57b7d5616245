//! OpenAI implementation of [`LlmClient`]: one chat completion per prompt.

use std::sync::Arc;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;
use tracing::{info, instrument};

use super::{mask_token, GenerationError, LlmClient};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// LlmClient backed by async-openai. The composed prompt is sent as a single user message.
#[derive(Clone)]
pub struct OpenAILlmClient {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
    /// Stored only for masked logging.
    api_key_for_logging: String,
}

impl OpenAILlmClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, None)
    }

    pub fn with_base_url(api_key: String, base_url: Option<&str>) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key.clone());
        if let Some(url) = base_url.filter(|s| !s.is_empty()) {
            config = config.with_api_base(url);
        }
        Self {
            client: Arc::new(Client::with_config(config)),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            api_key_for_logging: api_key,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn classify(e: OpenAIError) -> GenerationError {
    match e {
        OpenAIError::Reqwest(e) => GenerationError::Transport(e.to_string()),
        OpenAIError::ApiError(api) => GenerationError::Service {
            status: None,
            message: api.message,
        },
        other => GenerationError::Service {
            status: None,
            message: other.to_string(),
        },
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        info!(
            model = %self.model,
            api_key = %mask_token(&self.api_key_for_logging),
            "OpenAI chat_completion request"
        );

        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(classify)?;
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages(vec![message.into()])
            .build()
            .map_err(classify)?;

        let response = self.client.chat().create(request).await.map_err(classify)?;

        if let Some(ref u) = response.usage {
            info!(
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                total_tokens = u.total_tokens,
                "OpenAI chat_completion usage"
            );
        }

        let answer = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .map(|content| content.trim().to_string())
            .unwrap_or_default();
        if answer.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(answer)
    }
}
