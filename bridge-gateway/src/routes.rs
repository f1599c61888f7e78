//! Axum route handlers for the bridge gateway.

use std::{any::Any, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use bridge_core::{Channel, Envelope, Task};

use crate::{auth, error::BridgeError, limit, state::AppState};

/// Inbound request body ceiling.
pub const MAX_BODY_BYTES: usize = 200 * 1024;

// ── Request types ─────────────────────────────────────────────────────────────

/// Fields are read optimistically: a missing required field is a 400, not a
/// deserialization failure.
#[derive(Debug, Deserialize)]
pub struct SendMessageBody {
    pub channel: Option<String>,
    pub target: Option<String>,
    pub message: Option<String>,
    /// Provider-specific options, e.g. a formatting mode.
    pub meta: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ScrapeBody {
    #[serde(rename = "targetUrl")]
    pub target_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<Value>,
    pub options: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct EnqueueBody {
    pub queue: Option<String>,
    pub payload: Option<Value>,
    /// Opaque to the gateway; forwarded to the queue service verbatim.
    #[serde(rename = "delaySeconds")]
    pub delay_seconds: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduledTaskBody {
    pub task: Option<String>,
    pub payload: Option<Value>,
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the application router over the shared state.
///
/// Layer order, outermost first: request tracing, panic backstop, body
/// limit, rate limiter, then per-route auth on the business routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/bridge/sendMessage", post(send_message))
        .route("/bridge/scrape", post(scrape))
        .route("/bridge/enqueue", post(enqueue))
        .route("/bridge/scheduled-task", post(scheduled_task))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::require_bearer,
        ));

    Router::new()
        .route("/bridge/health", get(health))
        .merge(protected)
        .fallback(fallback)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            limit::enforce_rate_limit,
        ))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Backstop: a panic escaping a handler still produces the error envelope.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "internal error".to_owned()
    };
    tracing::error!(error = %detail, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Envelope::error(detail)),
    )
        .into_response()
}

async fn fallback() -> BridgeError {
    BridgeError::NotFound
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /bridge/health` — liveness probe, no auth.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Envelope> {
    Json(Envelope::ok(json!({
        "uptime": state.started.elapsed().as_secs_f64(),
    })))
}

/// `POST /bridge/sendMessage` — forward a message to the selected provider.
///
/// # Errors
/// 400 on missing `channel`/`target`/`message`, 500 for an unknown channel
/// or any provider failure.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SendMessageBody>, JsonRejection>,
) -> Result<Json<Envelope>, BridgeError> {
    let Json(body) = parse_body(body)?;
    let (Some(channel), Some(target), Some(message)) = (
        present(body.channel),
        present(body.target),
        present(body.message),
    ) else {
        return Err(BridgeError::InvalidRequest("missing fields".to_owned()));
    };
    let channel: Channel = channel
        .parse()
        .map_err(|_| BridgeError::UnsupportedChannel)?;

    let data = match channel {
        Channel::Telegram => {
            // Empty/zero/null formatting modes fall back to the default;
            // anything else passes through to the provider opaquely.
            let default_mode = json!("Markdown");
            let parse_mode = body
                .meta
                .as_ref()
                .and_then(|m| m.get("parse_mode"))
                .filter(|v| !is_falsy(v))
                .unwrap_or(&default_mode);
            let reply = state
                .backends
                .send_telegram(&target, &message, parse_mode)
                .await?;
            json!({ "provider": channel.as_str(), "providerResponse": reply })
        }
        Channel::Whatsapp => {
            let reply = state.backends.send_whatsapp(&target, &message).await?;
            json!({ "provider": channel.as_str(), "providerResponse": reply })
        }
    };
    Ok(Json(Envelope::ok(data)))
}

/// `POST /bridge/scrape` — forward a scrape request to the scraper service.
///
/// # Errors
/// 400 on missing `targetUrl`, 500 when no scraper is configured or the
/// call fails.
pub async fn scrape(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ScrapeBody>, JsonRejection>,
) -> Result<Json<Envelope>, BridgeError> {
    let Json(body) = parse_body(body)?;
    let Some(target_url) = present(body.target_url) else {
        return Err(BridgeError::InvalidRequest("missing targetUrl".to_owned()));
    };
    let result = state
        .backends
        .scrape(&target_url, body.kind.as_ref(), body.options.as_ref())
        .await?;
    Ok(Json(Envelope::ok(json!({
        "source": "scraper-service",
        "result": result,
    }))))
}

/// `POST /bridge/enqueue` — submit a job to the queue service.
///
/// The backend's response body becomes the envelope `data` as-is, without
/// the keyed nesting the other routes use; callers depend on the flat shape.
///
/// # Errors
/// 400 on missing `queue` or `payload`, 500 when no queue backend is
/// configured or the call fails.
pub async fn enqueue(
    State(state): State<Arc<AppState>>,
    body: Result<Json<EnqueueBody>, JsonRejection>,
) -> Result<Json<Envelope>, BridgeError> {
    let Json(body) = parse_body(body)?;
    let (Some(queue), Some(payload)) = (present(body.queue), body.payload) else {
        return Err(BridgeError::InvalidRequest("missing fields".to_owned()));
    };
    let result = state
        .backends
        .enqueue(&queue, &payload, body.delay_seconds.as_ref())
        .await?;
    Ok(Json(Envelope::ok(result)))
}

/// `POST /bridge/scheduled-task` — trigger a named scheduled job.
///
/// # Errors
/// 400 on missing `task`, 500 for an unknown task name or a report-service
/// failure.
pub async fn scheduled_task(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ScheduledTaskBody>, JsonRejection>,
) -> Result<Json<Envelope>, BridgeError> {
    let Json(body) = parse_body(body)?;
    let Some(task) = present(body.task) else {
        return Err(BridgeError::InvalidRequest("missing task".to_owned()));
    };
    let task: Task = task.parse().map_err(|_| BridgeError::UnsupportedTask)?;

    match task {
        Task::DailySummary => {
            let result = state
                .backends
                .generate_report(body.payload.as_ref())
                .await?;
            Ok(Json(Envelope::ok(json!({
                "task": task.as_str(),
                "result": result,
            }))))
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<Json<T>, BridgeError> {
    body.map_err(|_| BridgeError::InvalidRequest("invalid JSON body".to_owned()))
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Values the formatting-mode fallback treats as unset.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use bridge_backends::{BackendClient, BackendConfig};
    use tower::ServiceExt;

    use crate::config::GatewayConfig;

    const TOKEN: &str = "test-secret";

    fn test_state(backends: BackendConfig) -> Arc<AppState> {
        Arc::new(AppState::new(
            GatewayConfig {
                listen_addr: "127.0.0.1:0".to_owned(),
                auth_token: TOKEN.to_owned(),
            },
            BackendClient::new(backends),
        ))
    }

    fn test_app() -> Router {
        create_router(test_state(BackendConfig::default()))
    }

    fn post_json(uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        match builder.body(Body::from(body.to_string())) {
            Ok(r) => r,
            Err(e) => panic!("failed to build request: {e}"),
        }
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = match app.oneshot(request).await {
            Ok(r) => r,
            Err(e) => panic!("handler error: {e}"),
        };
        let status = response.status();
        let bytes = match axum::body::to_bytes(response.into_body(), usize::MAX).await {
            Ok(b) => b,
            Err(e) => panic!("failed to read body: {e}"),
        };
        let body: Value = match serde_json::from_slice(&bytes) {
            Ok(v) => v,
            Err(e) => panic!("invalid JSON: {e}"),
        };
        (status, body)
    }

    #[tokio::test]
    async fn health_returns_ok_with_numeric_uptime() {
        let (status, body) = send(
            test_app(),
            match Request::builder().uri("/bridge/health").body(Body::empty()) {
                Ok(r) => r,
                Err(e) => panic!("failed to build request: {e}"),
            },
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["data"]["uptime"].is_number(), "got: {body}");
    }

    #[tokio::test]
    async fn missing_auth_header_is_401() {
        let req = post_json("/bridge/sendMessage", None, &json!({}));
        let (status, body) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"status": "error", "error": "missing auth"}));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_401() {
        let req = match Request::builder()
            .method("POST")
            .uri("/bridge/sendMessage")
            .header("content-type", "application/json")
            .header("authorization", "Basic dXNlcjpwYXNz")
            .body(Body::from("{}"))
        {
            Ok(r) => r,
            Err(e) => panic!("failed to build request: {e}"),
        };
        let (status, _) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_token_is_403() {
        let req = post_json("/bridge/sendMessage", Some("nope"), &json!({}));
        let (status, body) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({"status": "error", "error": "forbidden"}));
    }

    #[tokio::test]
    async fn send_message_missing_fields_is_400() {
        let req = post_json(
            "/bridge/sendMessage",
            Some(TOKEN),
            &json!({"channel": "telegram", "target": "42"}),
        );
        let (status, body) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing fields");
    }

    #[tokio::test]
    async fn send_message_empty_field_counts_as_missing() {
        let req = post_json(
            "/bridge/sendMessage",
            Some(TOKEN),
            &json!({"channel": "telegram", "target": "42", "message": ""}),
        );
        let (status, body) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing fields");
    }

    #[tokio::test]
    async fn unknown_channel_is_500_with_provider_message() {
        let req = post_json(
            "/bridge/sendMessage",
            Some(TOKEN),
            &json!({"channel": "sms", "target": "42", "message": "hi"}),
        );
        let (status, body) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "no provider configured for channel");
    }

    #[tokio::test]
    async fn telegram_without_token_is_500_not_configured() {
        let req = post_json(
            "/bridge/sendMessage",
            Some(TOKEN),
            &json!({"channel": "telegram", "target": "42", "message": "hi"}),
        );
        let (status, body) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "telegram token not configured");
    }

    #[tokio::test]
    async fn whatsapp_without_config_is_500_not_configured() {
        let req = post_json(
            "/bridge/sendMessage",
            Some(TOKEN),
            &json!({"channel": "whatsapp", "target": "42", "message": "hi"}),
        );
        let (status, body) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "whatsapp not configured");
    }

    #[tokio::test]
    async fn scrape_missing_target_url_is_400() {
        let req = post_json("/bridge/scrape", Some(TOKEN), &json!({"type": "article"}));
        let (status, body) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing targetUrl");
    }

    #[tokio::test]
    async fn scrape_without_backend_is_500() {
        let req = post_json(
            "/bridge/scrape",
            Some(TOKEN),
            &json!({"targetUrl": "https://example.com"}),
        );
        let (status, body) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "no scraping backend configured");
    }

    #[tokio::test]
    async fn enqueue_missing_payload_is_400() {
        let req = post_json("/bridge/enqueue", Some(TOKEN), &json!({"queue": "emails"}));
        let (status, body) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing fields");
    }

    #[tokio::test]
    async fn enqueue_without_backend_is_500() {
        let req = post_json(
            "/bridge/enqueue",
            Some(TOKEN),
            &json!({"queue": "emails", "payload": {"x": 1}}),
        );
        let (status, body) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "no queue backend configured");
    }

    #[tokio::test]
    async fn scheduled_task_missing_task_is_400() {
        let req = post_json("/bridge/scheduled-task", Some(TOKEN), &json!({}));
        let (status, body) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing task");
    }

    #[tokio::test]
    async fn unknown_task_is_500_with_scheduled_message() {
        let req = post_json(
            "/bridge/scheduled-task",
            Some(TOKEN),
            &json!({"task": "weekly-summary"}),
        );
        let (status, body) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "no scheduled backend configured");
    }

    #[tokio::test]
    async fn daily_summary_without_report_backend_is_500() {
        let req = post_json(
            "/bridge/scheduled-task",
            Some(TOKEN),
            &json!({"task": "daily-summary"}),
        );
        let (status, body) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "report service missing");
    }

    #[tokio::test]
    async fn malformed_json_body_is_400_envelope() {
        let req = match Request::builder()
            .method("POST")
            .uri("/bridge/enqueue")
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {TOKEN}"))
            .body(Body::from("{not json"))
        {
            Ok(r) => r,
            Err(e) => panic!("failed to build request: {e}"),
        };
        let (status, body) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"status": "error", "error": "invalid JSON body"}));
    }

    #[tokio::test]
    async fn unknown_path_returns_404_envelope() {
        let req = match Request::builder().uri("/bridge/nope").body(Body::empty()) {
            Ok(r) => r,
            Err(e) => panic!("failed to build request: {e}"),
        };
        let (status, body) = send(test_app(), req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"status": "error", "error": "not found"}));
    }

    #[test]
    fn falsy_parse_modes_are_treated_as_unset() {
        assert!(is_falsy(&json!(null)));
        assert!(is_falsy(&json!(false)));
        assert!(is_falsy(&json!("")));
        assert!(is_falsy(&json!(0)));
        assert!(!is_falsy(&json!("HTML")));
        assert!(!is_falsy(&json!(1)));
        assert!(!is_falsy(&json!({"custom": true})));
    }

    #[tokio::test]
    async fn panicking_handler_becomes_500_envelope() {
        async fn boom() -> Json<Envelope> {
            panic!("kaboom")
        }
        let app = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(handle_panic));
        let req = match Request::builder().uri("/boom").body(Body::empty()) {
            Ok(r) => r,
            Err(e) => panic!("failed to build request: {e}"),
        };
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"status": "error", "error": "kaboom"}));
    }

    #[tokio::test]
    async fn requests_over_window_ceiling_get_429() {
        let app = test_app();
        for _ in 0..limit::MAX_REQUESTS {
            let req = match Request::builder().uri("/bridge/health").body(Body::empty()) {
                Ok(r) => r,
                Err(e) => panic!("failed to build request: {e}"),
            };
            let (status, _) = send(app.clone(), req).await;
            assert_eq!(status, StatusCode::OK);
        }
        let req = match Request::builder().uri("/bridge/health").body(Body::empty()) {
            Ok(r) => r,
            Err(e) => panic!("failed to build request: {e}"),
        };
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body, json!({"status": "error", "error": "too many requests"}));
    }

    #[tokio::test]
    async fn rate_limit_runs_before_auth() {
        let app = test_app();
        for _ in 0..limit::MAX_REQUESTS {
            let req = match Request::builder().uri("/bridge/health").body(Body::empty()) {
                Ok(r) => r,
                Err(e) => panic!("failed to build request: {e}"),
            };
            let _ = send(app.clone(), req).await;
        }
        // Over the ceiling, an unauthenticated POST is throttled, not 401'd.
        let req = post_json("/bridge/sendMessage", None, &json!({}));
        let (status, _) = send(app, req).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    }
}
