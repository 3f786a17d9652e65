//! Server configuration
//!
//! Values come from the Shuttle secret store, falling back to the process
//! environment (a `.env` file is loaded first). The lookup is injected so the
//! same parsing runs in tests.

use std::time::Duration;

pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const GEMINI_MODEL: &str = "GEMINI_MODEL";
pub const GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
pub const GEMINI_TIMEOUT_SECS: &str = "GEMINI_TIMEOUT_SECS";

pub const DEFAULT_MODEL: &str = "gemini-3.1-pro-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Settings for the generation client
#[derive(Clone)]
pub struct ServerConfig {
    /// Gemini credential; `None` when unset or blank
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// Per-request timeout for Gemini calls; no timeout when `None`
    pub request_timeout: Option<Duration>,
}

impl ServerConfig {
    /// Build config from a key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let request_timeout = non_blank(GEMINI_TIMEOUT_SECS).and_then(|raw| {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    tracing::warn!("Ignoring invalid {}: {:?}", GEMINI_TIMEOUT_SECS, raw);
                    None
                }
            }
        });

        Self {
            gemini_api_key: non_blank(GEMINI_API_KEY),
            gemini_model: non_blank(GEMINI_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: non_blank(GEMINI_BASE_URL)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout,
        }
    }
}

// Keeps the credential out of logs
impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
