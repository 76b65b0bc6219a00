//! Wire-level tests for the Gemini embedding and generation clients,
//! using wiremock in place of the remote API.

use sage::rag::embeddings::Embedder;
use sage::types::AppError;
use sage::{GeminiClient, GeminiEmbedder, LLMClient};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

// ============= Embedding =============

#[tokio::test]
async fn test_embed_single_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/text-embedding-004:batchEmbedContents"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embeddings": [{"values": [0.1, 0.2, 0.3]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let embedder = GeminiEmbedder::new(server.uri(), "test-key", "text-embedding-004");
    let vector = embedder.embed("hello").await.unwrap();
    assert_eq!(vector, vec![0.1, 0.2, 0.3]);
}

#[tokio::test]
async fn test_embed_server_error_surfaces_as_embedding_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let embedder = GeminiEmbedder::new(server.uri(), "test-key", "text-embedding-004");
    let err = embedder.embed("hello").await.unwrap_err();
    match err {
        AppError::Embedding(msg) => assert!(msg.contains("500")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_embed_count_mismatch_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embeddings": [{"values": [0.1]}, {"values": [0.2]}]
        })))
        .mount(&server)
        .await;

    let embedder = GeminiEmbedder::new(server.uri(), "test-key", "text-embedding-004");
    let err = embedder.embed("just one").await.unwrap_err();
    assert!(matches!(err, AppError::Embedding(_)));
}

/// Responder that returns one embedding per request in the batch, so the
/// batching path can be tested without pinning batch boundaries.
struct EchoBatch;

impl Respond for EchoBatch {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: serde_json::Value = match serde_json::from_slice(&request.body) {
            Ok(v) => v,
            Err(_) => return ResponseTemplate::new(400),
        };
        let count = body["requests"].as_array().map(|a| a.len()).unwrap_or(0);
        let embeddings: Vec<serde_json::Value> =
            (0..count).map(|i| json!({"values": [i as f32, 1.0]})).collect();
        ResponseTemplate::new(200).set_body_json(json!({ "embeddings": embeddings }))
    }
}

#[tokio::test]
async fn test_embed_many_splits_into_batches_of_100() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/text-embedding-004:batchEmbedContents"))
        .respond_with(EchoBatch)
        .expect(3)
        .mount(&server)
        .await;

    let embedder = GeminiEmbedder::new(server.uri(), "test-key", "text-embedding-004");
    let texts: Vec<String> = (0..250).map(|i| format!("text {}", i)).collect();
    let vectors = embedder.embed_many(&texts).await.unwrap();

    assert_eq!(vectors.len(), 250);
    // First element of each batch restarts the per-batch counter.
    assert_eq!(vectors[0][0], 0.0);
    assert_eq!(vectors[100][0], 0.0);
    assert_eq!(vectors[200][0], 0.0);
}

#[tokio::test]
async fn test_embed_many_empty_input_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let embedder = GeminiEmbedder::new(server.uri(), "test-key", "text-embedding-004");
    let vectors = embedder.embed_many(&[]).await.unwrap();
    assert!(vectors.is_empty());
}

// ============= Generation =============

#[tokio::test]
async fn test_generate_returns_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-pro:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "Focus on growth."}]}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(server.uri(), "test-key", "gemini-2.5-pro", 0.7);
    let answer = client
        .generate_with_system("be an advisor", "What matters?")
        .await
        .unwrap();
    assert_eq!(answer, "Focus on growth.");
}

#[tokio::test]
async fn test_generate_sends_system_instruction_and_temperature() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
        })))
        .mount(&server)
        .await;

    let client = GeminiClient::new(server.uri(), "test-key", "gemini-2.5-pro", 0.5);
    client.generate_with_system("system text", "user text").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body["systemInstruction"]["parts"][0]["text"],
        "system text"
    );
    assert_eq!(body["contents"][0]["parts"][0]["text"], "user text");
    assert_eq!(body["generationConfig"]["temperature"], 0.5);
}

#[tokio::test]
async fn test_generate_server_error_surfaces_as_generation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let client = GeminiClient::new(server.uri(), "test-key", "gemini-2.5-pro", 0.7);
    let err = client.generate_with_system("s", "p").await.unwrap_err();
    match err {
        AppError::Generation(msg) => assert!(msg.contains("500")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_generate_empty_candidates_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let client = GeminiClient::new(server.uri(), "test-key", "gemini-2.5-pro", 0.7);
    let err = client.generate_with_system("s", "p").await.unwrap_err();
    assert!(matches!(err, AppError::Generation(_)));
}
