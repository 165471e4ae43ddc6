//! Request logger that reports every response to the telemetry sink.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use serde_json::json;
use std::net::SocketAddr;
use std::time::Instant;

use crate::domain::telemetry::{LogLevel, SOURCE_MIDDLEWARE};
use crate::error::ErrorMessage;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Emits one telemetry entry per completed request.
///
/// Message format is `"{METHOD} {URL} {STATUS} {MS}ms"` with context
/// `{method, url, statusCode, durationMs, ip, userAgent, requestId}`.
/// Server errors (5xx) additionally produce an `error` entry carrying the
/// error message. Emission never delays or alters the response.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/{code}", get(redirect_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), request_log::layer));
/// ```
pub async fn layer(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = req.method().to_string();
    let url = req.uri().to_string();
    let ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| client_ip(req.headers(), *addr, state.behind_proxy));
    let user_agent = header_str(&req, header::USER_AGENT.as_str());
    let request_id = header_str(&req, "x-request-id");

    let response = next.run(req).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis() as u64;

    let context = json!({
        "method": method,
        "url": url,
        "statusCode": status.as_u16(),
        "durationMs": duration_ms,
        "ip": ip,
        "userAgent": user_agent,
        "requestId": request_id,
    });

    state.telemetry.emit(
        LogLevel::Info,
        SOURCE_MIDDLEWARE,
        format!("{} {} {} {}ms", method, url, status.as_u16(), duration_ms),
        context.clone(),
    );

    if status.is_server_error() {
        let message = response
            .extensions()
            .get::<ErrorMessage>()
            .map(|m| m.0.clone())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Server error").to_string());

        state
            .telemetry
            .emit_error(SOURCE_MIDDLEWARE, message, None, context);
    }

    response
}

fn header_str(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
