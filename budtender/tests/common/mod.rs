//! Shared mocks and fixtures for budtender integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use budtender::{build_components_with, AppComponents, AppConfig};
use embedding::{EmbeddingService, EnvEmbeddingConfig};
use llm_client::{EnvLlmConfig, GenerationError, GeneratorProvider, LlmClient};
use storage::ProductRecord;

const AXES: [&str; 11] = [
    "blue", "dream", "og", "kush", "lemon", "haze", "berry", "citrus", "pine", "sleep", "energy",
];

pub const BLUE_DREAM: &str = "Blue Dream is a sativa-dominant hybrid with sweet berry notes.";
pub const BUBBA_KUSH: &str = "Bubba Kush is an indica bred from OG Kush.";
pub const OG_KUSH: &str =
    "OG Kush, also known as Premium OG, is the og kush strain with pine, lemon, and citrus.";
pub const LEMON_HAZE: &str = "Lemon Haze is a citrus sativa with lemon zest.";

/// Deterministic embedding: word counts over a small cannabis vocabulary.
pub struct KeywordEmbedding;

impl KeywordEmbedding {
    pub fn vector(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        AXES.iter()
            .map(|axis| words.iter().filter(|w| *w == axis).count() as f32)
            .collect()
    }
}

#[async_trait]
impl EmbeddingService for KeywordEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        Ok(Self::vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }
}

/// [`KeywordEmbedding`] that counts batch calls (one per index build).
#[derive(Default)]
pub struct CountingEmbedding {
    batch_calls: AtomicUsize,
}

impl CountingEmbedding {
    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingService for CountingEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        Ok(KeywordEmbedding::vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| KeywordEmbedding::vector(t)).collect())
    }
}

#[derive(Debug, Clone)]
pub enum Reply {
    Answer(String),
    Transport,
    Service(u16),
    Empty,
}

/// Generator that records prompts and replies as configured.
pub struct MockGenerator {
    reply: Reply,
    ready: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn answering(answer: &str) -> Self {
        Self::new(Reply::Answer(answer.to_string()))
    }

    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            ready: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn not_ready(mut self) -> Self {
        self.ready = false;
        self
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Reply::Answer(answer) => Ok(answer.clone()),
            Reply::Transport => Err(GenerationError::Transport("connection refused".to_string())),
            Reply::Service(status) => Err(GenerationError::Service {
                status: Some(*status),
                message: "model not loaded".to_string(),
            }),
            Reply::Empty => Err(GenerationError::EmptyResponse),
        }
    }

    async fn check_ready(&self) -> Result<(), GenerationError> {
        if self.ready {
            Ok(())
        } else {
            Err(GenerationError::Transport("connection refused".to_string()))
        }
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        index_file: None,
        log_file: "logs/test.log".to_string(),
        session_timeout_minutes: 30,
        session_history_limit: 5,
        topic_threshold: 0.75,
        embedding: EnvEmbeddingConfig {
            embedding_model: "test".to_string(),
            openai_api_key: String::new(),
            openai_base_url: Some("http://localhost:1".to_string()),
        },
        llm: EnvLlmConfig {
            provider: GeneratorProvider::Ollama,
            ollama_url: "http://localhost:1".to_string(),
            ollama_model: "test".to_string(),
            openai_api_key: String::new(),
            openai_base_url: None,
            openai_model: "test".to_string(),
        },
    }
}

pub fn catalog_records() -> Vec<ProductRecord> {
    vec![
        ProductRecord::new("blue-dream", BLUE_DREAM),
        ProductRecord::new("bubba-kush", BUBBA_KUSH),
        ProductRecord::new("og-kush", OG_KUSH),
        ProductRecord::new("lemon-haze", LEMON_HAZE),
    ]
}

/// Components over an in-memory database holding the test catalog, index built.
pub async fn components_with(generator: Arc<dyn LlmClient>) -> AppComponents {
    let components = build_components_with(&test_config(), Arc::new(KeywordEmbedding), generator)
        .await
        .expect("components build");
    components
        .repo
        .save_all(&catalog_records())
        .await
        .expect("catalog saved");
    components
        .search_service()
        .refresh_index()
        .await
        .expect("index built");
    components
}
