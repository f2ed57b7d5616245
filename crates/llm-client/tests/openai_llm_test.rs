//! Tests for [`llm_client::OpenAILlmClient`] against a mockito server standing in for
//! `/chat/completions`.

use llm_client::{GenerationError, LlmClient, OpenAILlmClient};
use mockito::Matcher;
use serde_json::json;

fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16 }
    })
    .to_string()
}

/// **Test: The prompt is sent as one user message and the answer comes back trimmed.**
#[tokio::test]
async fn test_generate_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-4o-mini",
            "messages": [{ "role": "user", "content": "Customer question: Is it piney?" }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body("  Yes, with an earthy finish.  "))
        .create_async()
        .await;

    let client = OpenAILlmClient::with_base_url("sk-test".to_string(), Some(&server.url()));
    let answer = client.generate("Customer question: Is it piney?").await.unwrap();

    assert_eq!(answer, "Yes, with an earthy finish.");
    mock.assert_async().await;
}

/// **Test: Blank completion content is an EmptyResponse error.**
#[tokio::test]
async fn test_generate_blank_content_is_empty_response() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body("   "))
        .create_async()
        .await;

    let client = OpenAILlmClient::with_base_url("sk-test".to_string(), Some(&server.url()));
    let err = client.generate("hi").await.unwrap_err();

    assert!(matches!(err, GenerationError::EmptyResponse));
}

/// **Test: An API error body maps to a Service error with its message.**
#[tokio::test]
async fn test_generate_api_error_is_service_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "error": {
                    "message": "model not found",
                    "type": "invalid_request_error",
                    "param": null,
                    "code": null
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = OpenAILlmClient::with_base_url("sk-test".to_string(), Some(&server.url()))
        .with_model("missing-model");
    let err = client.generate("hi").await.unwrap_err();

    match err {
        GenerationError::Service { message, .. } => assert!(message.contains("model not found")),
        other => panic!("expected Service error, got {:?}", other),
    }
}
