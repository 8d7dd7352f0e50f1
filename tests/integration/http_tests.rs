//! Fetcher and Ollama client against local HTTP servers

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use brandscout::config::settings::{ModelSettings, ScraperSettings};
use brandscout::error::{FetchError, ModelError};
use brandscout::llm::{LanguageModel, OllamaClient, QueryResponder};
use brandscout::scrape::{ProductSource, ProxyFetcher};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const SEARCH_PAGE: &str = r#"
<html><body>
<div class="s-main-slot">
  <div class="s-result-item">
    <h2><span class="a-size-medium a-color-base a-text-normal">Washing Machine X</span></h2>
    <span class="a-price"><span class="a-price-whole">12,999</span></span>
    <i><span class="a-icon-alt">4.5 out of 5 stars</span></i>
    <a class="s-link-style"><span class="a-size-base">1,234</span></a>
  </div>
  <div class="s-result-item">
    <h2><span class="a-size-medium a-color-base a-text-normal">No price here</span></h2>
    <i><span class="a-icon-alt">4.9 out of 5 stars</span></i>
  </div>
</div>
</body></html>
"#;

/// Serve `app` on an ephemeral local port
async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn scraper_settings(addr: SocketAddr) -> ScraperSettings {
    ScraperSettings {
        api_key: Some("test-key".to_string()),
        endpoint: format!("http://{}", addr),
        timeout_secs: 5,
        ..ScraperSettings::default()
    }
}

type Captured = Arc<Mutex<Option<HashMap<String, String>>>>;

#[tokio::test]
async fn test_fetcher_parses_proxy_response() {
    let captured: Captured = Arc::default();
    let app = Router::new()
        .route(
            "/",
            get(
                |State(captured): State<Captured>,
                 Query(params): Query<HashMap<String, String>>| async move {
                    *captured.lock().unwrap() = Some(params);
                    Html(SEARCH_PAGE)
                },
            ),
        )
        .with_state(captured.clone());
    let addr = serve(app).await;

    let fetcher = ProxyFetcher::new(scraper_settings(addr)).unwrap();
    let records = fetcher.fetch("washing machine").await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Washing Machine X");
    assert_eq!(records[0].price, "\u{20b9}12,999");
    assert_eq!(records[0].rating, 4.5);
    assert_eq!(records[0].reviews, 1234);

    let params = captured.lock().unwrap().clone().unwrap();
    assert_eq!(params.get("api_key").map(String::as_str), Some("test-key"));
    assert_eq!(
        params.get("url").map(String::as_str),
        Some("https://www.amazon.in/s?k=washing%20machine")
    );
    assert_eq!(params.get("render").map(String::as_str), Some("true"));
}

#[tokio::test]
async fn test_fetcher_error_status() {
    let app = Router::new().route(
        "/",
        get(|| async { (StatusCode::FORBIDDEN, "quota exceeded") }),
    );
    let addr = serve(app).await;

    let fetcher = ProxyFetcher::new(scraper_settings(addr)).unwrap();
    let result = fetcher.fetch("tv").await;
    assert!(matches!(result, Err(FetchError::Status(403))));
}

#[tokio::test]
async fn test_fetcher_without_api_key_makes_no_request() {
    let fetcher = ProxyFetcher::new(ScraperSettings::default()).unwrap();
    let result = fetcher.fetch("tv").await;
    assert!(matches!(result, Err(FetchError::MissingApiKey)));
}

#[tokio::test]
async fn test_fetcher_unreachable_proxy_is_request_error() {
    // Bind then drop to get a local port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fetcher = ProxyFetcher::new(scraper_settings(addr)).unwrap();
    let result = fetcher.fetch("tv").await;
    assert!(matches!(result, Err(FetchError::Request(_))));
}

fn model_settings(addr: SocketAddr) -> ModelSettings {
    ModelSettings {
        name: "llama3".to_string(),
        base_url: format!("http://{}", addr),
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn test_ollama_client_sends_non_streaming_prompt() {
    let seen: Arc<Mutex<Option<Value>>> = Arc::default();
    let app = Router::new()
        .route(
            "/api/generate",
            post(
                |State(seen): State<Arc<Mutex<Option<Value>>>>, Json(body): Json<Value>| async move {
                    *seen.lock().unwrap() = Some(body);
                    Json(json!({ "model": "llama3", "response": "Brand A", "done": true }))
                },
            ),
        )
        .with_state(seen.clone());
    let addr = serve(app).await;

    let client = OllamaClient::new(&model_settings(addr));
    let answer = client.complete("Question: best?").await.unwrap();
    assert_eq!(answer, "Brand A");

    let body = seen.lock().unwrap().clone().unwrap();
    assert_eq!(body["model"], "llama3");
    assert_eq!(body["prompt"], "Question: best?");
    assert_eq!(body["stream"], false);
}

#[tokio::test]
async fn test_ollama_error_status_is_unavailable() {
    let app = Router::new().route(
        "/api/generate",
        post(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "model 'llama3' not found" })),
            )
        }),
    );
    let addr = serve(app).await;

    let client = OllamaClient::new(&model_settings(addr));
    match client.complete("hi").await {
        Err(ModelError::Unavailable(msg)) => assert!(msg.contains("not found")),
        other => panic!("Expected Unavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_ollama_missing_response_field() {
    let app = Router::new().route(
        "/api/generate",
        post(|| async { Json(json!({ "done": true })) }),
    );
    let addr = serve(app).await;

    let client = OllamaClient::new(&model_settings(addr));
    assert!(matches!(
        client.complete("hi").await,
        Err(ModelError::BadResponse(_))
    ));
}

#[tokio::test]
async fn test_responder_times_out_slow_model() {
    let app = Router::new().route(
        "/api/generate",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "response": "too late" }))
        }),
    );
    let addr = serve(app).await;

    let responder = QueryResponder::new(
        Arc::new(OllamaClient::new(&model_settings(addr))),
        Duration::from_millis(200),
    );
    let result = responder.answer("best?", "CREATE TABLE \"TopBrands\" ()").await;
    assert!(matches!(result, Err(ModelError::Timeout(_))));
}
