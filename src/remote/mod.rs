use crate::error::{AppError, Result};
use crate::event::AppEvent;
use serde_json::Value;
use std::sync::mpsc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, warn};

pub mod reply;

pub use reply::{classify_reply, ReplyShape};

/// Issues questions to the query webhook and reports replies over the UI
/// event channel.
#[derive(Clone)]
pub struct WebhookClient {
    http: reqwest::Client,
    url: String,
    tx: mpsc::Sender<AppEvent>,
    runtime_handle: Handle,
}

impl WebhookClient {
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        tx: mpsc::Sender<AppEvent>,
        runtime_handle: Handle,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
            tx,
            runtime_handle,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn send(&self, request_id: u64, question: String) {
        let http = self.http.clone();
        let url = self.url.clone();
        let tx = self.tx.clone();

        self.runtime_handle.spawn(async move {
            let reply = fetch_reply(&http, &url, &question)
                .await
                .map_err(|err| {
                    warn!(request_id, "webhook request failed: {err}");
                    err.to_string()
                });
            if tx.send(AppEvent::ReplyReceived { request_id, reply }).is_err() {
                debug!(request_id, "reply dropped: receiver gone");
            }
        });
    }
}

/// `GET <url>?question=<text>`, decoded as JSON. Non-2xx statuses are errors.
pub async fn fetch_reply(http: &reqwest::Client, url: &str, question: &str) -> Result<Value> {
    debug!(url, question, "sending webhook request");
    let response = http.get(url).query(&[("question", question)]).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Status(status.as_u16()));
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|err| AppError::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{fetch_reply, WebhookClient};
    use crate::error::AppError;
    use crate::event::AppEvent;
    use serde_json::json;
    use std::sync::mpsc;
    use std::time::Duration;
    use tokio::runtime::Handle;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serves one canned HTTP response and reports the request line.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("listener has an address");
        let (seen_tx, seen_rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("client should connect");
            let mut buffer = vec![0u8; 4096];
            let read = socket.read(&mut buffer).await.expect("request should be readable");
            let request = String::from_utf8_lossy(&buffer[..read]).to_string();
            let request_line = request.lines().next().unwrap_or_default().to_string();
            let _ = seen_tx.send(request_line);

            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("response should be written");
            let _ = socket.shutdown().await;
        });

        (format!("http://{addr}/webhook"), seen_rx)
    }

    #[tokio::test]
    async fn success_decodes_json_and_sends_question_parameter() {
        let (url, seen) = serve_once("HTTP/1.1 200 OK", r#"[{"RAG":"hello"}]"#).await;
        let http = reqwest::Client::new();

        let reply = fetch_reply(&http, &url, "pending crim checks")
            .await
            .expect("reply should decode");
        assert_eq!(reply, json!([{ "RAG": "hello" }]));

        let request_line = seen.await.expect("server should report the request");
        assert!(request_line.starts_with("GET /webhook?question=pending"));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (url, _seen) = serve_once("HTTP/1.1 500 Internal Server Error", "{}").await;
        let http = reqwest::Client::new();

        let error = fetch_reply(&http, &url, "anything")
            .await
            .expect_err("500 should fail");
        assert!(matches!(error, AppError::Status(500)));
        assert_eq!(error.to_string(), "HTTP error: 500");
    }

    #[tokio::test]
    async fn invalid_json_is_a_decode_error() {
        let (url, _seen) = serve_once("HTTP/1.1 200 OK", "not json").await;
        let http = reqwest::Client::new();

        let error = fetch_reply(&http, &url, "anything")
            .await
            .expect_err("bad body should fail");
        assert!(matches!(error, AppError::Decode(_)));
    }

    async fn next_event(rx: mpsc::Receiver<AppEvent>) -> AppEvent {
        tokio::task::spawn_blocking(move || {
            rx.recv_timeout(Duration::from_secs(5))
                .expect("client should report a reply")
        })
        .await
        .expect("receiver task should finish")
    }

    #[tokio::test]
    async fn send_reports_decoded_reply_with_request_id() {
        let (url, _seen) = serve_once("HTTP/1.1 200 OK", r#"[{"RAG":"two pending"}]"#).await;
        let (tx, rx) = mpsc::channel();
        let client = WebhookClient::new(url, Duration::from_secs(5), tx, Handle::current())
            .expect("client should build");

        client.send(7, "pending checks".to_string());

        match next_event(rx).await {
            AppEvent::ReplyReceived { request_id, reply } => {
                assert_eq!(request_id, 7);
                assert_eq!(reply, Ok(json!([{ "RAG": "two pending" }])));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn send_reports_failures_as_error_text() {
        let (url, _seen) = serve_once("HTTP/1.1 500 Internal Server Error", "{}").await;
        let (tx, rx) = mpsc::channel();
        let client = WebhookClient::new(url, Duration::from_secs(5), tx, Handle::current())
            .expect("client should build");

        client.send(3, "anything".to_string());

        match next_event(rx).await {
            AppEvent::ReplyReceived { request_id, reply } => {
                assert_eq!(request_id, 3);
                assert_eq!(reply, Err("HTTP error: 500".to_string()));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
