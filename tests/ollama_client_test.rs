/// Integration tests for the Ollama client
///
/// These tests run the client against a mock HTTP server.
///
/// Test coverage:
/// - Chat request body and response parsing
/// - Tool-call replies
/// - Error classification from HTTP status
/// - Batch embeddings
/// - NDJSON streaming to a handler

use mockito::{Matcher, Server};
use ragloom::domain::models::{ChatMessage, ChatRequest, ToolParameter, ToolSpec};
use ragloom::domain::models::ParamType;
use ragloom::domain::ports::{ChatModel, EmbeddingProvider};
use ragloom::infrastructure::ollama::{OllamaClient, OllamaClientConfig, OllamaEmbeddingProvider};
use ragloom::services::{StreamEvent, StreamingChatService};
use ragloom::DomainError;
use serde_json::json;
use std::sync::Arc;

fn client_for(server: &Server) -> OllamaClient {
    let config = OllamaClientConfig {
        base_url: server.url(),
        timeout_secs: 5,
        ..Default::default()
    };
    OllamaClient::new(config).expect("Failed to create client")
}

#[tokio::test]
async fn test_chat_success_with_mock() {
    // Arrange
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "model": "llama3.2",
            "stream": false,
            "messages": [{"role": "user", "content": "Say hello"}],
            "options": {"temperature": 0.7}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "model": "llama3.2",
                "message": {"role": "assistant", "content": "Hello"},
                "done": true,
                "prompt_eval_count": 12,
                "eval_count": 2
            })
            .to_string(),
        )
        .create_async()
        .await;
    let client = client_for(&server);

    // Act
    let response = client
        .generate(ChatRequest::new(vec![ChatMessage::user("Say hello")]))
        .await
        .expect("Chat failed");

    // Assert
    assert_eq!(response.text(), "Hello");
    let usage = response.usage.expect("usage reported");
    assert_eq!(usage.input_tokens, 12);
    assert_eq!(usage.output_tokens, 2);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_tool_calls_are_parsed() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::PartialJson(json!({
            "tools": [{
                "type": "function",
                "function": {"name": "add"}
            }]
        })))
        .with_status(200)
        .with_body(
            json!({
                "message": {
                    "role": "assistant",
                    "content": "",
                    "tool_calls": [{"function": {"name": "add", "arguments": {"a": 1, "b": 2}}}]
                },
                "done": true
            })
            .to_string(),
        )
        .create_async()
        .await;
    let client = client_for(&server);

    let add = ToolSpec {
        name: "add".to_string(),
        description: "Adds two numbers".to_string(),
        parameters: vec![
            ToolParameter::number("a", "First number"),
            ToolParameter::number("b", "Second number"),
        ],
        returns: ParamType::Number,
    };
    let request = ChatRequest::new(vec![ChatMessage::user("1 + 2?")]).with_tools(vec![add]);
    let response = client.generate(request).await.expect("Chat failed");

    assert!(response.message.has_tool_requests());
    assert_eq!(response.message.tool_requests[0].name, "add");
    assert_eq!(response.message.tool_requests[0].arguments, json!({"a": 1, "b": 2}));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_model_is_provider_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(404)
        .with_body(r#"{"error":"model 'llama3.2' not found"}"#)
        .create_async()
        .await;
    let client = client_for(&server);

    let err = client
        .generate_text("hello")
        .await
        .expect_err("404 should fail");

    match err {
        DomainError::Provider(message) => assert!(message.starts_with("Model not found")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .with_status(500)
        .with_body("boom")
        .expect(1)
        .create_async()
        .await;
    let client = client_for(&server);

    assert!(client.generate_text("hello").await.is_err());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_embed_batch() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/embed")
        .match_body(Matcher::PartialJson(json!({
            "model": "all-minilm",
            "input": ["first", "second"]
        })))
        .with_status(200)
        .with_body(json!({"embeddings": [[0.1, 0.2], [0.3, 0.4]]}).to_string())
        .create_async()
        .await;
    let provider = OllamaEmbeddingProvider::new(client_for(&server));

    let embeddings = provider
        .embed_all(&["first".to_string(), "second".to_string()])
        .await
        .expect("Embedding failed");

    assert_eq!(embeddings.len(), 2);
    assert_eq!(embeddings[1].vector(), &[0.3, 0.4]);
    assert_eq!(provider.dimension(), None);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_embedding_count_mismatch_fails() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/embed")
        .with_status(200)
        .with_body(json!({"embeddings": [[0.1, 0.2]]}).to_string())
        .create_async()
        .await;
    let provider = OllamaEmbeddingProvider::new(client_for(&server));

    let result = provider
        .embed_all(&["first".to_string(), "second".to_string()])
        .await;
    assert!(matches!(result, Err(DomainError::Provider(_))));
}

#[tokio::test]
async fn test_streaming_tokens_then_complete() {
    let mut server = Server::new_async().await;
    let body = [
        json!({"message": {"role": "assistant", "content": "Hel"}, "done": false}),
        json!({"message": {"role": "assistant", "content": "lo"}, "done": false}),
        json!({"message": {"role": "assistant", "content": ""}, "done": true, "eval_count": 2}),
    ]
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join("\n");
    let _mock = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::PartialJson(json!({"stream": true})))
        .with_status(200)
        .with_header("content-type", "application/x-ndjson")
        .with_body(body)
        .create_async()
        .await;
    let service = StreamingChatService::new(Arc::new(client_for(&server)));

    let (mut events, handle) = service.stream_events("Say hello").expect("stream started");
    let mut received = Vec::new();
    while let Some(event) = events.recv().await {
        received.push(event);
    }

    assert_eq!(
        received,
        vec![
            StreamEvent::Token("Hel".to_string()),
            StreamEvent::Token("lo".to_string()),
            StreamEvent::Complete("Hello".to_string()),
        ]
    );
    assert_eq!(handle.wait().await.unwrap(), "Hello");
}

#[tokio::test]
async fn test_streaming_truncated_body_reports_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body(json!({"message": {"role": "assistant", "content": "Hel"}, "done": false}).to_string())
        .create_async()
        .await;
    let service = StreamingChatService::new(Arc::new(client_for(&server)));

    let (mut events, handle) = service.stream_events("Say hello").expect("stream started");
    let mut received = Vec::new();
    while let Some(event) = events.recv().await {
        received.push(event);
    }

    assert_eq!(received.len(), 2);
    assert!(received[1].is_terminal());
    assert!(matches!(received[1], StreamEvent::Error(_)));
    assert!(handle.wait().await.is_err());
}
