//! HTTP client for the configured backend services.
//!
//! One `reqwest::Client` shared across all backends; each method issues
//! exactly one outbound POST, applies a call-specific timeout, and returns
//! the backend's JSON body untouched. Timeouts are treated identically to
//! any other transport failure.

use std::time::Duration;

use serde_json::{json, Map, Value};

use crate::{config::BackendConfig, error::BackendError};

const MESSAGING_TIMEOUT: Duration = Duration::from_secs(10);
const SCRAPE_TIMEOUT: Duration = Duration::from_secs(20);
const ENQUEUE_TIMEOUT: Duration = Duration::from_secs(5);
const REPORT_TIMEOUT: Duration = Duration::from_secs(20);

/// Client for all outbound backend calls.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    config: BackendConfig,
}

impl BackendClient {
    /// Build a client over the given backend configuration.
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Send a message through the Telegram bot API.
    ///
    /// # Errors
    /// Returns [`BackendError::NotConfigured`] if no bot token is set, and
    /// [`BackendError::UpstreamStatus`] / [`BackendError::Transport`] for
    /// provider failures.
    pub async fn send_telegram(
        &self,
        target: &str,
        message: &str,
        parse_mode: &Value,
    ) -> Result<Value, BackendError> {
        let token = self
            .config
            .telegram_bot_token
            .as_deref()
            .ok_or(BackendError::NotConfigured("telegram token not configured"))?;
        let url = format!("{}/bot{token}/sendMessage", self.config.telegram_api_url);
        let body = json!({
            "chat_id": target,
            "text": message,
            "parse_mode": parse_mode,
        });
        self.post_json("telegram", &url, &body, None, MESSAGING_TIMEOUT)
            .await
    }

    /// Send a plain-text message through the WhatsApp provider.
    ///
    /// # Errors
    /// Returns [`BackendError::NotConfigured`] if the base URL or API key is
    /// missing, otherwise the usual upstream/transport failures.
    pub async fn send_whatsapp(&self, target: &str, message: &str) -> Result<Value, BackendError> {
        let (Some(base), Some(key)) = (
            self.config.whatsapp_api_url.as_deref(),
            self.config.whatsapp_api_key.as_deref(),
        ) else {
            return Err(BackendError::NotConfigured("whatsapp not configured"));
        };
        let url = format!("{base}/messages");
        let body = json!({
            "to": target,
            "type": "text",
            "text": { "body": message },
        });
        self.post_json("whatsapp", &url, &body, Some(key), MESSAGING_TIMEOUT)
            .await
    }

    /// Forward a scrape request to the scraper service.
    ///
    /// Absent optional fields are omitted from the outbound body rather than
    /// sent as `null`.
    ///
    /// # Errors
    /// Returns [`BackendError::NotConfigured`] if no scraper endpoint is set.
    pub async fn scrape(
        &self,
        target_url: &str,
        kind: Option<&Value>,
        options: Option<&Value>,
    ) -> Result<Value, BackendError> {
        let endpoint = self
            .config
            .scraper_url
            .as_deref()
            .ok_or(BackendError::NotConfigured("no scraping backend configured"))?;
        let mut body = Map::new();
        body.insert("url".to_owned(), Value::from(target_url));
        if let Some(kind) = kind {
            body.insert("type".to_owned(), kind.clone());
        }
        if let Some(options) = options {
            body.insert("options".to_owned(), options.clone());
        }
        self.post_json(
            "scraper",
            endpoint,
            &Value::Object(body),
            None,
            SCRAPE_TIMEOUT,
        )
        .await
    }

    /// Submit a job to the queue service.
    ///
    /// `delay_seconds` is forwarded opaquely; the queue service owns its
    /// interpretation.
    ///
    /// # Errors
    /// Returns [`BackendError::NotConfigured`] if no jobs endpoint is set.
    pub async fn enqueue(
        &self,
        queue: &str,
        payload: &Value,
        delay_seconds: Option<&Value>,
    ) -> Result<Value, BackendError> {
        let base = self
            .config
            .jobs_url
            .as_deref()
            .ok_or(BackendError::NotConfigured("no queue backend configured"))?;
        let url = format!("{base}/jobs");
        let mut body = Map::new();
        body.insert("queue".to_owned(), Value::from(queue));
        body.insert("payload".to_owned(), payload.clone());
        if let Some(delay) = delay_seconds {
            body.insert("delaySeconds".to_owned(), delay.clone());
        }
        self.post_json("jobs", &url, &Value::Object(body), None, ENQUEUE_TIMEOUT)
            .await
    }

    /// Ask the report service to generate a report.
    ///
    /// # Errors
    /// Returns [`BackendError::NotConfigured`] if no report endpoint is set.
    pub async fn generate_report(&self, payload: Option<&Value>) -> Result<Value, BackendError> {
        let base = self
            .config
            .report_url
            .as_deref()
            .ok_or(BackendError::NotConfigured("report service missing"))?;
        let url = format!("{base}/generate");
        let mut body = Map::new();
        if let Some(payload) = payload {
            body.insert("payload".to_owned(), payload.clone());
        }
        self.post_json("report", &url, &Value::Object(body), None, REPORT_TIMEOUT)
            .await
    }

    async fn post_json(
        &self,
        backend: &'static str,
        url: &str,
        body: &Value,
        bearer: Option<&str>,
        timeout: Duration,
    ) -> Result<Value, BackendError> {
        tracing::debug!(backend, url, "forwarding request");
        let mut request = self.http.post(url).json(body).timeout(timeout);
        if let Some(key) = bearer {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::UpstreamStatus {
                backend,
                status: status.as_u16(),
            });
        }
        Ok(response.json::<Value>().await?)
    }
}
