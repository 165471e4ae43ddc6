//! Remote telemetry collector over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::domain::telemetry::{LogEntry, TelemetryError, TelemetrySink};

/// Posts each entry as JSON to a collector endpoint.
///
/// One attempt per [`TelemetrySink::deliver`] call; retries belong to the worker.
/// The bearer token, when configured, is sent on every request.
pub struct HttpSink {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpSink {
    /// Creates a sink for `endpoint` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Transport`] if the endpoint is not an http(s)
    /// URL or the HTTP client cannot be built.
    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, TelemetryError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| TelemetryError::Transport(format!("invalid endpoint: {e}")))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(TelemetryError::Transport(format!(
                "unsupported endpoint scheme: {}",
                endpoint.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TelemetryError::Transport(format!("client build: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

#[async_trait]
impl TelemetrySink for HttpSink {
    async fn deliver(&self, entry: &LogEntry) -> Result<(), TelemetryError> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(entry);

        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TelemetryError::Transport(format!("collector post: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TelemetryError::Rejected(status.as_u16()));
        }

        debug!(status = status.as_u16(), "Telemetry entry delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::LogLevel;
    use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
    use chrono::Utc;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    type Captured = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    async fn spawn_collector(status: StatusCode) -> (String, Captured) {
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));
        let sink = captured.clone();

        let app = Router::new().route(
            "/logs",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let sink = sink.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    sink.lock().await.push((auth, body));
                    status
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/logs", addr), captured)
    }

    fn entry() -> LogEntry {
        LogEntry::new(
            LogLevel::Info,
            "controller",
            "short url created",
            json!({ "code": "abcd" }),
            Utc::now(),
        )
    }

    #[test]
    fn test_rejects_invalid_endpoint() {
        assert!(HttpSink::new("not a url", None, Duration::from_secs(1)).is_err());
        assert!(HttpSink::new("ftp://collector.local", None, Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn test_deliver_posts_entry_with_bearer() {
        let (endpoint, captured) = spawn_collector(StatusCode::OK).await;
        let sink =
            HttpSink::new(&endpoint, Some("secret".to_string()), Duration::from_secs(4)).unwrap();

        sink.deliver(&entry()).await.unwrap();

        let captured = captured.lock().await;
        assert_eq!(captured.len(), 1);
        let (auth, body) = &captured[0];
        assert_eq!(auth.as_deref(), Some("Bearer secret"));
        assert_eq!(body["level"], "info");
        assert_eq!(body["package"], "controller");
        assert_eq!(body["message"], "short url created");
        assert_eq!(body["context"]["code"], "abcd");
        assert!(body.get("stack").is_none());
    }

    #[tokio::test]
    async fn test_deliver_without_api_key() {
        let (endpoint, captured) = spawn_collector(StatusCode::OK).await;
        let sink = HttpSink::new(&endpoint, Some(String::new()), Duration::from_secs(4)).unwrap();

        sink.deliver(&entry()).await.unwrap();

        assert!(captured.lock().await[0].0.is_none());
    }

    #[tokio::test]
    async fn test_non_success_status_is_rejected() {
        let (endpoint, _captured) = spawn_collector(StatusCode::SERVICE_UNAVAILABLE).await;
        let sink = HttpSink::new(&endpoint, None, Duration::from_secs(4)).unwrap();

        let result = sink.deliver(&entry()).await;
        assert!(matches!(result, Err(TelemetryError::Rejected(503))));
    }
}
