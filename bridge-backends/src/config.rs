//! Environment-derived backend addresses and credentials.
//!
//! Resolved once at process start and passed by reference from then on; a
//! missing value is not a startup failure — it becomes a "not configured"
//! error when the first request needs it.

/// Addresses and credentials for every backend the bridge can forward to.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Telegram bot token (`TELEGRAM_BOT_TOKEN`).
    pub telegram_bot_token: Option<String>,
    /// Telegram API base URL (`TELEGRAM_API_URL`).
    pub telegram_api_url: String,
    /// WhatsApp provider base URL (`WHATSAPP_API_URL`).
    pub whatsapp_api_url: Option<String>,
    /// WhatsApp bearer key (`WHATSAPP_API_KEY`).
    pub whatsapp_api_key: Option<String>,
    /// Scraper service endpoint (`SCRAPER_SERVICE_URL`).
    pub scraper_url: Option<String>,
    /// Job-queue service base URL (`JOBS_SERVICE_URL`).
    pub jobs_url: Option<String>,
    /// Report-generator service base URL (`REPORT_SERVICE_URL`).
    pub report_url: Option<String>,
}

impl BackendConfig {
    /// Default Telegram API host when `TELEGRAM_API_URL` is unset.
    pub const DEFAULT_TELEGRAM_API_URL: &'static str = "https://api.telegram.org";

    /// Read the backend configuration from the process environment.
    /// Empty values count as unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            telegram_bot_token: env_opt("TELEGRAM_BOT_TOKEN"),
            telegram_api_url: env_opt("TELEGRAM_API_URL")
                .unwrap_or_else(|| Self::DEFAULT_TELEGRAM_API_URL.to_owned()),
            whatsapp_api_url: env_opt("WHATSAPP_API_URL"),
            whatsapp_api_key: env_opt("WHATSAPP_API_KEY"),
            scraper_url: env_opt("SCRAPER_SERVICE_URL"),
            jobs_url: env_opt("JOBS_SERVICE_URL"),
            report_url: env_opt("REPORT_SERVICE_URL"),
        }
    }
}

impl Default for BackendConfig {
    /// A config with no backend configured; useful as a test baseline.
    fn default() -> Self {
        Self {
            telegram_bot_token: None,
            telegram_api_url: Self::DEFAULT_TELEGRAM_API_URL.to_owned(),
            whatsapp_api_url: None,
            whatsapp_api_key: None,
            scraper_url: None,
            jobs_url: None,
            report_url: None,
        }
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
