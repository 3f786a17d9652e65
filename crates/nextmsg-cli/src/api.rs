//! NextMsg API Client
//!
//! Talks to the server's single-relationship endpoint. Fan-out happens on
//! this side, one request per relationship.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use nextmsg::{Mode, Relationship, RewriteError, RewriteGenerator, RewriteRequest, RewriteResult};

/// API Client for NextMsg
pub struct NextMsgClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RewritePayload<'a> {
    mode: Mode,
    draft: &'a str,
    relationship: Relationship,
    #[serde(skip_serializing_if = "Option::is_none")]
    received_message: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl NextMsgClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }
}

#[async_trait]
impl RewriteGenerator for NextMsgClient {
    async fn generate(&self, request: &RewriteRequest) -> Result<Vec<RewriteResult>, RewriteError> {
        let url = format!("{}/api/rewrite", self.base_url);
        let payload = RewritePayload {
            mode: request.mode,
            draft: &request.draft,
            relationship: request.relationship,
            received_message: request.reply_context(),
        };

        tracing::debug!("POST {} ({})", url, request.relationship);

        let resp = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                RewriteError::Service(format!("Failed to connect to NextMsg server: {}", e))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(map_api_error(status, &body));
        }

        resp.json::<Vec<RewriteResult>>()
            .await
            .map_err(|e| RewriteError::malformed(e.to_string()))
    }

    fn provider_name(&self) -> &str {
        "nextmsg"
    }

    fn model_id(&self) -> &str {
        &self.base_url
    }
}

/// Server errors carry `{"error": ...}`; fall back to the raw body
fn map_api_error(status: StatusCode, body: &str) -> RewriteError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string());

    if status == StatusCode::BAD_REQUEST {
        RewriteError::Validation(message)
    } else {
        RewriteError::Service(format!("API error ({}): {}", status.as_u16(), message))
    }
}
