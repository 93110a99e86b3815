//! LLM move provider against a local stand-in endpoint.

use axum::{Json, Router, http::HeaderMap, routing::post};
use serde_json::{Value, json};
use spartan_arena::{
    LlmClient, LlmConfig, LlmMoveProvider, LlmProvider, MoveProvider, MoveRequest,
};
use spartan_tictactoe::{Board, Side};

/// Serves `router` on an ephemeral port and returns its base URL.
async fn mock(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn request() -> MoveRequest {
    let board = Board::new().with_move(4, Side::Spartan).unwrap();
    MoveRequest::new(board, Side::Persian, Side::Spartan)
}

fn provider(vendor: LlmProvider, base_url: String) -> LlmMoveProvider {
    let config = LlmConfig::new(vendor, "test-key".to_string(), "test-model".to_string(), 16)
        .with_base_url(base_url);
    LlmMoveProvider::new(LlmClient::new(config))
}

#[tokio::test]
async fn test_openai_reply_is_parsed() {
    let router = Router::new().route(
        "/chat/completions",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            assert_eq!(headers["authorization"], "Bearer test-key");
            assert_eq!(body["model"], "test-model");
            let prompt = body["messages"][1]["content"].as_str().unwrap();
            assert!(prompt.contains("The human plays 'X'. You play 'O'."));
            Json(json!({ "choices": [{ "message": { "content": "0" } }] }))
        }),
    );
    let provider = provider(LlmProvider::OpenAI, mock(router).await);

    assert_eq!(provider.request_move(&request()).await.unwrap(), 0);
    assert_eq!(provider.name(), "llm:test-model");
}

#[tokio::test]
async fn test_anthropic_reply_is_parsed() {
    let router = Router::new().route(
        "/messages",
        post(|headers: HeaderMap| async move {
            assert_eq!(headers["x-api-key"], "test-key");
            Json(json!({ "content": [{ "type": "text", "text": "8\n" }] }))
        }),
    );
    let provider = provider(LlmProvider::Anthropic, mock(router).await);
    assert_eq!(provider.request_move(&request()).await.unwrap(), 8);
}

#[tokio::test]
async fn test_gemini_disables_thinking() {
    let router = Router::new().route(
        "/models/{model}",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["generationConfig"]["thinkingConfig"]["thinkingBudget"], 0);
            assert_eq!(body["generationConfig"]["responseMimeType"], "text/plain");
            Json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "2" }] } }]
            }))
        }),
    );
    let provider = provider(LlmProvider::Gemini, mock(router).await);
    assert_eq!(provider.request_move(&request()).await.unwrap(), 2);
}

#[tokio::test]
async fn test_non_numeric_reply_is_an_error() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async { Json(json!({ "choices": [{ "message": { "content": "center" } }] })) }),
    );
    let provider = provider(LlmProvider::OpenAI, mock(router).await);
    assert!(provider.request_move(&request()).await.is_err());
}

#[tokio::test]
async fn test_http_error_status_is_an_error() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async { (axum::http::StatusCode::TOO_MANY_REQUESTS, "slow down") }),
    );
    let provider = provider(LlmProvider::OpenAI, mock(router).await);
    let err = provider.request_move(&request()).await.unwrap_err();
    assert!(err.message.contains("429"));
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_live_gemini_move() {
    dotenvy::dotenv().ok();
    let key = std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY not set");
    let config = LlmConfig::new(LlmProvider::Gemini, key, "gemini-2.5-flash".to_string(), 16);
    let provider = LlmMoveProvider::new(LlmClient::new(config));

    let index = provider.request_move(&request()).await.unwrap();
    assert!(index < 9);
}
