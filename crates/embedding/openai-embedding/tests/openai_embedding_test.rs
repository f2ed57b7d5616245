//! Tests for the OpenAI-compatible embedding service.
//!
//! Request/response handling is checked against a mockito server standing in for the
//! embeddings endpoint. The real-API test is `#[ignore]` and needs OPENAI_API_KEY;
//! run with: `cargo test -p openai-embedding -- --ignored`

use std::path::Path;

use embedding::EmbeddingService;
use openai_embedding::OpenAIEmbedding;
use serde_json::json;

/// Load `.env` from workspace root so OPENAI_API_KEY is available in ignored tests.
fn load_root_env() {
    let root_env = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../.env");
    let _ = dotenvy::from_path(root_env);
}

fn embeddings_body(vectors: &[Vec<f32>]) -> String {
    let data: Vec<_> = vectors
        .iter()
        .enumerate()
        .map(|(i, v)| json!({ "object": "embedding", "index": i, "embedding": v }))
        .collect();
    json!({
        "object": "list",
        "model": "test-embed",
        "data": data,
        "usage": { "prompt_tokens": 4, "total_tokens": 4 }
    })
    .to_string()
}

/// **Test: Single embed against a mock endpoint returns the vector from the response.**
#[tokio::test]
async fn test_embed_uses_base_url() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(embeddings_body(&[vec![0.1, 0.2, 0.3]]))
        .create_async()
        .await;

    let service = OpenAIEmbedding::new_with_base_url(
        "sk-test".to_string(),
        "test-embed".to_string(),
        Some(&server.url()),
    );

    let vector = service.embed("blue dream").await.unwrap();

    assert_eq!(vector, vec![0.1, 0.2, 0.3]);
    mock.assert_async().await;
}

/// **Test: Batch embed returns one vector per input, in order.**
#[tokio::test]
async fn test_embed_batch_returns_vectors_in_order() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(embeddings_body(&[vec![1.0, 0.0], vec![0.0, 1.0]]))
        .create_async()
        .await;

    let service = OpenAIEmbedding::new_with_base_url(
        "sk-test".to_string(),
        "test-embed".to_string(),
        Some(&server.url()),
    );

    let vectors = service
        .embed_batch(&["og kush".to_string(), "sour diesel".to_string()])
        .await
        .unwrap();

    assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
}

/// **Test: A response with fewer vectors than inputs is an error.**
#[tokio::test]
async fn test_embed_batch_count_mismatch_is_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(embeddings_body(&[vec![1.0, 0.0]]))
        .create_async()
        .await;

    let service = OpenAIEmbedding::new_with_base_url(
        "sk-test".to_string(),
        "test-embed".to_string(),
        Some(&server.url()),
    );

    let result = service
        .embed_batch(&["a".to_string(), "b".to_string()])
        .await;

    assert!(result.is_err());
}

/// **Test: Empty batch never calls the endpoint.**
#[tokio::test]
async fn test_embed_batch_empty_input() {
    let service = OpenAIEmbedding::new_with_base_url(
        "sk-test".to_string(),
        "test-embed".to_string(),
        Some("http://127.0.0.1:9"),
    );

    let vectors = service.embed_batch(&[]).await.unwrap();

    assert!(vectors.is_empty());
}

/// **Test: Construction with default model (no API call).**
#[tokio::test]
async fn test_with_api_key_default_model() {
    let service = OpenAIEmbedding::with_api_key(String::new());
    assert_eq!(service.model(), "text-embedding-3-small");
    let service = service.with_model("nomic-embed-text".to_string());
    assert_eq!(service.model(), "nomic-embed-text");
    assert_eq!(service.model_id(), "nomic-embed-text");
}

/// **Test: Real API single embed (ignored by default).**
#[tokio::test]
#[ignore]
async fn test_openai_embedding_real_api() {
    load_root_env();
    let api_key = std::env::var("OPENAI_API_KEY")
        .expect("OPENAI_API_KEY must be set for this test (or set in root .env)");

    let service = OpenAIEmbedding::new(api_key, "text-embedding-3-small".to_string());
    let vector = service
        .embed("Kandy Kush is an indica-dominant hybrid")
        .await
        .unwrap();

    assert_eq!(vector.len(), 1536);
}
