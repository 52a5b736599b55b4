use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chat_widget::config::{ServerConfig, UiConfig};
use chat_widget::{ChatBackend, ChatError, ChatWidget, HttpBackend};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Sent = Arc<Mutex<Vec<String>>>;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn backend(base_url: &str) -> HttpBackend {
    HttpBackend::with_client(base_url, reqwest::Client::new()).unwrap()
}

async fn healthy_server(sent: Sent) -> String {
    async fn chat(State(sent): State<Sent>, Json(body): Json<Value>) -> Json<Value> {
        let message = body["message"].as_str().unwrap_or_default().to_string();
        sent.lock().unwrap().push(message);
        Json(json!({"status": "ok"}))
    }

    async fn messages() -> Json<Value> {
        Json(json!([
            {"user": "alice", "text": "hi"},
            {"text": "no name"},
            "raw",
        ]))
    }

    let router = Router::new()
        .route("/chat", post(chat))
        .route("/messages", get(messages))
        .with_state(sent);
    serve(router).await
}

async fn failing_server() -> String {
    let router = Router::new()
        .route(
            "/chat",
            post(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({"detail": "Highlights data not loaded yet."})),
                )
            }),
        )
        .route(
            "/messages",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        );
    serve(router).await
}

#[tokio::test]
async fn posts_message_body() {
    let sent = Sent::default();
    let url = healthy_server(Arc::clone(&sent)).await;

    backend(&url).send_message("hello").await.unwrap();

    assert_eq!(*sent.lock().unwrap(), vec!["hello".to_string()]);
}

#[tokio::test]
async fn fetches_mixed_message_list() {
    let url = healthy_server(Sent::default()).await;

    let lines: Vec<String> = backend(&url)
        .fetch_messages()
        .await
        .unwrap()
        .iter()
        .map(|m| m.display_line())
        .collect();

    assert_eq!(lines, vec!["alice: hi", "Anonymous: no name", "raw"]);
}

#[tokio::test]
async fn error_detail_is_surfaced() {
    let url = failing_server().await;

    let err = backend(&url).send_message("hello").await.unwrap_err();

    assert_eq!(
        err,
        ChatError::Status {
            status: 503,
            detail: Some("Highlights data not loaded yet.".to_string()),
        }
    );
}

#[tokio::test]
async fn non_json_error_body_uses_status_code() {
    let url = failing_server().await;

    let err = backend(&url).fetch_messages().await.unwrap_err();

    assert_eq!(err.reason(), "HTTP error! status: 500");
}

#[tokio::test]
async fn malformed_list_is_a_decode_error() {
    let router = Router::new().route("/messages", get(|| async { "definitely not json" }));
    let url = serve(router).await;

    let err = backend(&url).fetch_messages().await.unwrap_err();

    assert!(matches!(err, ChatError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn missing_route_is_a_status_error() {
    let url = serve(Router::new()).await;

    let err = backend(&url).send_message("hello").await.unwrap_err();

    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = backend(&format!("http://{addr}")).send_message("hello").await.unwrap_err();

    assert!(matches!(err, ChatError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn configured_timeout_is_a_transport_error() {
    let router = Router::new().route(
        "/messages",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!([]))
        }),
    );
    let url = serve(router).await;
    let backend = HttpBackend::new(&ServerConfig {
        base_url: url,
        timeout_secs: Some(1),
    })
    .unwrap();

    let err = backend.fetch_messages().await.unwrap_err();

    assert!(matches!(err, ChatError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn widget_against_live_backend() {
    let sent = Sent::default();
    let url = healthy_server(Arc::clone(&sent)).await;
    let backend = backend(&url);
    let mut widget = ChatWidget::new(&UiConfig::default());

    assert_eq!(widget.run_load(&backend).await, Ok(3));
    assert_eq!(widget.run_submit(&backend, " new one ").await, Some(Ok(())));

    assert_eq!(
        widget.display().texts(),
        vec!["alice: hi", "Anonymous: no name", "raw", "You: new one"]
    );
    assert_eq!(widget.input_value(), "");
    assert!(widget.state().send_enabled && widget.state().input_enabled);
    assert_eq!(*sent.lock().unwrap(), vec!["new one".to_string()]);
}

#[tokio::test]
async fn widget_against_failing_backend() {
    let url = failing_server().await;
    let backend = backend(&url);
    let mut widget = ChatWidget::new(&UiConfig::default());

    assert!(widget.run_load(&backend).await.is_err());
    assert!(widget.run_submit(&backend, "hello").await.unwrap().is_err());

    assert_eq!(
        widget.display().texts(),
        vec![
            "Error fetching messages: HTTP error! status: 500. Please try refreshing.",
            "Error sending message: Highlights data not loaded yet.. Please try again.",
        ]
    );
    assert!(widget.state().status().is_none());
}
