use axum::http::{ HeaderMap, StatusCode };
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{ Json, Router };
use landing_chat::models::chat::SentimentLabel;
use landing_chat::sentiment::remote::RemoteSentimentClient;
use landing_chat::sentiment::{
    analyze_or_fallback,
    new_analyzer,
    SentimentAnalyzer,
    SentimentConfig,
    SentimentError,
    SentimentMode,
};
use serde_json::{ json, Value };

async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn analyze(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "Bearer secret")
        .unwrap_or(false);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" })));
    }
    let text = body["text"].as_str().unwrap_or_default();
    let (label, score) = if text.contains("mal") { ("negative", 0.7) } else { ("positive", 0.8) };
    (StatusCode::OK, Json(json!({ "label": label, "score": score, "confidence": 0.9 })))
}

fn client(base: &str, key: Option<&str>) -> RemoteSentimentClient {
    RemoteSentimentClient::new(Some(base.to_string()), key.map(String::from)).unwrap()
}

#[tokio::test]
async fn posts_text_and_parses_result() {
    let base = spawn_server(Router::new().route("/api/analyze-sentiment", post(analyze))).await;

    let result = client(&base, Some("secret")).analyze("todo salió bien").await.unwrap();
    assert_eq!(result.label, SentimentLabel::Positive);
    assert!((result.score - 0.8).abs() < 1e-6);
    assert!((result.confidence - 0.9).abs() < 1e-6);

    let result = client(&base, Some("secret")).analyze("me fue mal").await.unwrap();
    assert_eq!(result.label, SentimentLabel::Negative);
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let app = Router::new().route("/widget/api/analyze-sentiment", post(analyze));
    let base = spawn_server(app).await;

    let result = client(&format!("{}/widget", base), Some("secret")).analyze("bien").await.unwrap();
    assert_eq!(result.label, SentimentLabel::Positive);
}

#[tokio::test]
async fn non_success_status_is_a_status_error() {
    let base = spawn_server(Router::new().route("/api/analyze-sentiment", post(analyze))).await;

    let err = client(&base, Some("wrong")).analyze("hola").await.unwrap_err();
    assert!(matches!(err, SentimentError::Status(401)));
}

#[tokio::test]
async fn server_error_is_surfaced() {
    let app = Router::new().route(
        "/api/analyze-sentiment",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR })
    );
    let base = spawn_server(app).await;

    let err = client(&base, Some("secret")).analyze("hola").await.unwrap_err();
    assert!(matches!(err, SentimentError::Status(500)));
}

#[tokio::test]
async fn malformed_body_is_a_transport_error() {
    let app = Router::new().route("/api/analyze-sentiment", post(|| async { "not json" }));
    let base = spawn_server(app).await;

    let err = client(&base, Some("secret")).analyze("hola").await.unwrap_err();
    assert!(matches!(err, SentimentError::Transport(_)));
}

#[tokio::test]
async fn missing_credential_is_a_configuration_error() {
    let err = client("http://127.0.0.1:9", None).analyze("hola").await.unwrap_err();
    assert!(matches!(err, SentimentError::MissingCredential));
}

#[tokio::test]
async fn unreachable_service_falls_back_to_lexicon() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let analyzer = new_analyzer(&SentimentConfig {
        mode: SentimentMode::Remote,
        base_url: Some(format!("http://{}", addr)),
        api_key: Some("secret".into()),
    }).unwrap();

    let direct = analyzer.analyze("excelente").await;
    assert!(matches!(direct, Err(SentimentError::Transport(_))));

    let result = analyze_or_fallback(analyzer.as_ref(), "excelente").await;
    assert_eq!(result.label, SentimentLabel::Positive);
}
