use axum::Router;
use emotion_relay::{
    backend::QueueClient,
    config::{BackendConfig, ServerConfig},
    relay::RelayHandler,
    server::{self, handlers::AppState},
};
use serde_json::{Value, json};
use std::{sync::Arc, time::Duration};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub const JOIN_PATH: &str = "/gradio_api/queue/join";
pub const DATA_PATH: &str = "/gradio_api/queue/data";

/// Backend configuration pointing at a mock server, with one-second timeouts
pub fn backend_config(base_url: &str) -> BackendConfig {
    BackendConfig {
        base_url: base_url.to_string(),
        join_timeout_secs: 1,
        stream_timeout_secs: 1,
        ..BackendConfig::default()
    }
}

pub fn queue_client(server: &MockServer) -> QueueClient {
    QueueClient::new(backend_config(&server.uri()))
}

pub fn relay_for(server: &MockServer) -> RelayHandler {
    relay_for_url(&server.uri())
}

pub fn relay_for_url(base_url: &str) -> RelayHandler {
    let config = backend_config(base_url);
    RelayHandler::new(Arc::new(QueueClient::new(config.clone())), &config)
}

pub fn app_for(server: &MockServer) -> Router {
    app_for_url(&server.uri())
}

pub fn app_for_url(base_url: &str) -> Router {
    let state = AppState {
        relay: Arc::new(relay_for_url(base_url)),
    };
    server::app(state, &ServerConfig::default())
}

/// Renders events as an SSE body of `data:` lines
pub fn sse_body(events: &[Value]) -> String {
    events
        .iter()
        .map(|event| format!("data: {}\n\n", event))
        .collect()
}

pub fn sse_response(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into().into_bytes(), "text/event-stream")
}

pub fn slow(template: ResponseTemplate) -> ResponseTemplate {
    template.set_delay(Duration::from_millis(1500))
}

pub async fn mount_join(server: &MockServer, response: ResponseTemplate, expected: u64) {
    Mock::given(method("POST"))
        .and(path(JOIN_PATH))
        .respond_with(response)
        .expect(expected)
        .mount(server)
        .await;
}

pub async fn mount_stream(server: &MockServer, response: ResponseTemplate, expected: u64) {
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .respond_with(response)
        .expect(expected)
        .mount(server)
        .await;
}

/// Starts a raw HTTP backend whose data stream sends `first_event` and then stalls.
///
/// Queue joins are answered immediately with an event id. Returns the base URL.
pub async fn spawn_stalling_backend(first_event: Value) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let event = first_event.clone();
            tokio::spawn(serve_stalling(socket, event));
        }
    });

    format!("http://{}", addr)
}

async fn serve_stalling(mut socket: TcpStream, first_event: Value) {
    let head = read_request(&mut socket).await;

    if head.starts_with("POST") {
        let body = json!({"event_id": "stalled"}).to_string();
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        return;
    }

    let data = format!("data: {}\n\n", first_event);
    let response = format!(
        "HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\ntransfer-encoding: chunked\r\n\r\n{:x}\r\n{}\r\n",
        data.len(),
        data
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.flush().await;

    tokio::time::sleep(Duration::from_secs(5)).await;
}

/// Reads one request (head plus content-length body) and returns its head.
async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_string();
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);

            while buf.len() < end + 4 + content_length {
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }
            return head;
        }

        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return String::from_utf8_lossy(&buf).to_string(),
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}
