use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::net::TcpListener;
use tokio::sync::oneshot;

use libprotocol::{LoadTestRequest, SampleBatch};

async fn health() -> impl IntoResponse {
    "ok"
}

/// Stub load-generating backend: one synthetic latency sample per requested
/// qps, shaped by markers in the target url ("fail" -> 500, "malformed" ->
/// truncated JSON, "flaky" -> 0.25 burst error rate).
async fn loadtest(Json(request): Json<LoadTestRequest>) -> axum::response::Response {
    if request.url.contains("fail") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "burst failed").into_response();
    }
    if request.url.contains("malformed") {
        return ([(header::CONTENT_TYPE, "application/json")], "{\"latencies\": [").into_response();
    }

    let latencies: Vec<f64> = (0..request.qps).map(|i| 0.05 + 0.01 * f64::from(i)).collect();
    let error_rate = if request.url.contains("flaky") { 0.25 } else { 0.0 };
    Json(SampleBatch { latencies, error_rate }).into_response()
}

/// Returns (base_url, shutdown_sender, join_handle)
pub fn spawn_test_server() -> (String, oneshot::Sender<()>, tokio::task::JoinHandle<()>) {
    // listener on a random free port
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    let app = Router::new()
        .route("/", get(health))
        .route("/loadtest", post(loadtest));

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        let server = axum::serve(
            tokio::net::TcpListener::from_std(listener).unwrap(),
            app,
        )
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        });

        // a crashed stub must fail the test that owns it
        server.await.unwrap();
    });

    (base_url, shutdown_tx, handle)
}

pub async fn wait_until_ready(base_url: &str) {
    let client = reqwest::Client::new();
    for _ in 0..20 {
        if client.get(base_url).send().await.is_ok() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("stub backend not ready");
}
