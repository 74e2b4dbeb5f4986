
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::post,
    Router,
};
use genai_blog::{Config, ContentGenerator, GatewayError, GeminiClient, Part};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use test_utils::png_upload;

#[derive(Debug, Clone)]
struct Captured {
    api_key: Option<String>,
    call: String,
    body: Value,
}

#[derive(Clone)]
struct FakeGemini {
    status: StatusCode,
    reply: Value,
    captured: Arc<Mutex<Vec<Captured>>>,
}

async fn fake_generate(
    State(fake): State<FakeGemini>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    fake.captured.lock().unwrap().push(Captured {
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        call,
        body,
    });
    (fake.status, Json(fake.reply.clone()))
}

/// Starts a stand-in for the Gemini API and returns a client pointed at it.
async fn start(status: StatusCode, reply: Value, api_key: &str) -> (GeminiClient, Arc<Mutex<Vec<Captured>>>) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let fake = FakeGemini {
        status,
        reply,
        captured: captured.clone(),
    };
    let router = Router::new()
        .route("/v1beta/models/:call", post(fake_generate))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let base_url = format!("http://{addr}");
    let api_key = api_key.to_string();
    let config = Config::from_lookup(move |key| match key {
        "GOOGLE_API_KEY" => Some(api_key.clone()),
        "GEMINI_BASE_URL" => Some(base_url.clone()),
        _ => None,
    })
    .unwrap();

    (GeminiClient::new(&config), captured)
}

fn text_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn sends_text_part_with_key_header() {
    let (client, captured) = start(StatusCode::OK, text_reply("Here are five titles"), "test-key").await;

    let text = client
        .generate_content(&[Part::Text("Suggest 5 creative and engaging blog titles about: cats")])
        .await
        .unwrap();
    assert_eq!(text, "Here are five titles");

    let captured = captured.lock().unwrap().clone();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].api_key.as_deref(), Some("test-key"));
    assert_eq!(captured[0].call, "gemini-2.5-flash:generateContent");
    assert_eq!(
        captured[0].body,
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": "Suggest 5 creative and engaging blog titles about: cats" }]
            }]
        })
    );
}

#[tokio::test]
async fn sends_text_then_inline_image() {
    let (client, captured) = start(StatusCode::OK, text_reply("A bar chart"), "k").await;
    let image = png_upload();

    client
        .generate_content(&[Part::Text("describe"), Part::Image(&image)])
        .await
        .unwrap();

    let captured = captured.lock().unwrap().clone();
    let parts = captured[0].body["contents"][0]["parts"].as_array().unwrap().clone();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0], json!({ "text": "describe" }));
    assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");

    use base64::{engine::general_purpose, Engine as _};
    let data = parts[1]["inline_data"]["data"].as_str().unwrap();
    assert_eq!(general_purpose::STANDARD.decode(data).unwrap(), image.bytes);
}

#[tokio::test]
async fn rate_limit_maps_to_rate_limited() {
    let (client, _) = start(
        StatusCode::TOO_MANY_REQUESTS,
        json!({ "error": { "code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED" } }),
        "k",
    )
    .await;

    let err = client.generate_content(&[Part::Text("hi")]).await.unwrap_err();
    assert_eq!(
        err,
        GatewayError::RateLimited("429 Resource has been exhausted".to_string())
    );
    assert_eq!(err.display_text(), "Error: 429 Resource has been exhausted");
}

#[tokio::test]
async fn invalid_key_maps_to_unauthenticated() {
    let (client, _) = start(
        StatusCode::BAD_REQUEST,
        json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT",
                "details": [{ "reason": "API_KEY_INVALID" }]
            }
        }),
        "wrong",
    )
    .await;

    let err = client.generate_content(&[Part::Text("hi")]).await.unwrap_err();
    assert!(matches!(err, GatewayError::Unauthenticated(_)));
}

#[tokio::test]
async fn missing_key_fails_without_a_request() {
    let (client, captured) = start(StatusCode::OK, text_reply("unused"), "").await;

    let err = client.generate_content(&[Part::Text("hi")]).await.unwrap_err();
    assert!(matches!(err, GatewayError::Unauthenticated(_)));
    assert!(err.display_text().starts_with("Error: "));
    assert!(captured.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_service_is_a_network_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Config::from_lookup(move |key| match key {
        "GOOGLE_API_KEY" => Some("k".to_string()),
        "GEMINI_BASE_URL" => Some(format!("http://{addr}")),
        _ => None,
    })
    .unwrap();

    let err = GeminiClient::new(&config)
        .generate_content(&[Part::Text("hi")])
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::NetworkFailure(_)));
}

#[tokio::test]
async fn blocked_prompt_is_invalid_input() {
    let (client, _) = start(
        StatusCode::OK,
        json!({ "promptFeedback": { "blockReason": "SAFETY" } }),
        "k",
    )
    .await;

    let err = client.generate_content(&[Part::Text("hi")]).await.unwrap_err();
    assert!(matches!(err, GatewayError::InvalidInput(_)));
}
