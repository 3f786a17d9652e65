//! Gemini rewrite generator
//!
//! Calls `generateContent` with a fixed system instruction and a JSON
//! response schema, then validates the returned text into three variants.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};

use nextmsg::domain::services::{build_prompt, parse_variants, SYSTEM_INSTRUCTION};
use nextmsg::{RewriteError, RewriteGenerator, RewriteRequest, RewriteResult};

use crate::config::{ServerConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, GEMINI_API_KEY};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Generation client backed by the Gemini API
#[derive(Clone)]
pub struct GeminiGenerator {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiGenerator {
    /// Creates a generator with default model and endpoint.
    ///
    /// A missing key is accepted here and reported on every `generate` call.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.filter(|k| !k.is_empty()),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Creates a generator from server configuration
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            ..Self::new(config.gemini_api_key.clone())
        }
        .with_model(config.gemini_model.clone())
        .with_base_url(config.gemini_base_url.clone()))
    }

    /// Overrides the Gemini model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the API root (used to point at a local stand-in)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate_content(
        &self,
        api_key: &str,
        request: &RewriteRequest,
    ) -> Result<String, RewriteError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: build_prompt(request),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: variant_schema(),
            },
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| RewriteError::Service(format!("Request failed: {}", err)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, body));
        }

        let raw = response
            .text()
            .await
            .map_err(|err| RewriteError::Service(format!("Failed to read response: {}", err)))?;

        let payload: Value = serde_json::from_str(&raw).map_err(|err| {
            tracing::error!("Unparseable Gemini envelope ({}). Raw body: {}", err, raw);
            RewriteError::malformed(format!("response envelope: {}", err))
        })?;

        extract_text(&payload).ok_or_else(|| {
            tracing::warn!(
                "Gemini returned no text (finish reason: {}, block reason: {})",
                payload
                    .pointer("/candidates/0/finishReason")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("none"),
                payload
                    .pointer("/promptFeedback/blockReason")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("none"),
            );
            RewriteError::EmptyResponse
        })
    }
}

#[async_trait]
impl RewriteGenerator for GeminiGenerator {
    async fn generate(&self, request: &RewriteRequest) -> Result<Vec<RewriteResult>, RewriteError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| RewriteError::configuration(GEMINI_API_KEY))?;

        let text = self.generate_content(api_key, request).await?;

        parse_variants(&text).map_err(|err| {
            if let RewriteError::MalformedResponse { reason } = &err {
                tracing::error!(
                    "Failed to parse Gemini variants ({}). Raw text: {}",
                    reason,
                    text
                );
            }
            err
        })
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// ============================================
// Request Types
// ============================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

/// Array of `{type, text}` objects, both required
fn variant_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "type": {
                    "type": "STRING",
                    "description": "Soft, Standard, or Short"
                },
                "text": {
                    "type": "STRING",
                    "description": "The rewritten message text"
                }
            },
            "required": ["type", "text"]
        }
    })
}

// ============================================
// Helper Functions
// ============================================

/// Concatenated text parts of the first candidate
fn extract_text(root: &Value) -> Option<String> {
    let parts = root
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn map_http_error(status: StatusCode, body: String) -> RewriteError {
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|json| {
            json.pointer("/error/message")
                .and_then(Value::as_str)
                .map(|msg| msg.to_string())
        })
        .unwrap_or(body);

    if status == StatusCode::TOO_MANY_REQUESTS {
        return RewriteError::Service(format!("Rate limited: {}", message));
    }

    RewriteError::Service(format!("Gemini API error ({}): {}", status.as_u16(), message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
    use nextmsg::{Mode, Relationship, Tone};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// What the stand-in Gemini server saw
    #[derive(Default)]
    struct Captured {
        hits: AtomicUsize,
        path: Mutex<Option<String>>,
        api_key: Mutex<Option<String>>,
        body: Mutex<Option<Value>>,
    }

    #[derive(Clone)]
    struct MockGemini {
        status: axum::http::StatusCode,
        reply: Value,
        captured: Arc<Captured>,
    }

    async fn mock_generate(
        State(mock): State<MockGemini>,
        uri: axum::http::Uri,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (axum::http::StatusCode, Json<Value>) {
        mock.captured.hits.fetch_add(1, Ordering::SeqCst);
        *mock.captured.path.lock().unwrap() = Some(uri.path().to_string());
        *mock.captured.api_key.lock().unwrap() = headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        *mock.captured.body.lock().unwrap() = Some(body);
        (mock.status, Json(mock.reply.clone()))
    }

    /// Serve a canned reply on 127.0.0.1 and return its base URL
    async fn spawn_mock(status: u16, reply: Value) -> (String, Arc<Captured>) {
        let captured = Arc::new(Captured::default());
        let mock = MockGemini {
            status: axum::http::StatusCode::from_u16(status).unwrap(),
            reply,
            captured: captured.clone(),
        };
        let app = Router::new()
            .route("/v1beta/models/*rest", post(mock_generate))
            .with_state(mock);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/v1beta", addr), captured)
    }

    fn candidate_with_text(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        })
    }

    fn generator(api_key: Option<&str>, base_url: &str) -> GeminiGenerator {
        GeminiGenerator::new(api_key.map(str::to_string))
            .with_model("gemini-test")
            .with_base_url(base_url)
    }

    fn new_request() -> RewriteRequest {
        RewriteRequest::new(Mode::New, "明日の会議、少し遅れます", Relationship::Boss)
    }

    const VALID_VARIANTS: &str = r#"[
        {"type": "Soft", "text": "明日の会議、少し遅れてしまいそうです🙏"},
        {"type": "Standard", "text": "明日の会議、少し遅れます！"},
        {"type": "Short", "text": "明日少し遅れます"}
    ]"#;

    #[tokio::test]
    async fn test_missing_key_never_hits_transport() {
        let (base_url, captured) = spawn_mock(200, candidate_with_text(VALID_VARIANTS)).await;

        for key in [None, Some("")] {
            let err = generator(key, &base_url)
                .generate(&new_request())
                .await
                .unwrap_err();
            assert!(matches!(err, RewriteError::Configuration { .. }));
            assert_eq!(err.to_string(), "GEMINI_API_KEY is not configured");
        }

        assert_eq!(captured.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generate_success() {
        let (base_url, captured) = spawn_mock(200, candidate_with_text(VALID_VARIANTS)).await;

        let results = generator(Some("test-key"), &base_url)
            .generate(&new_request())
            .await
            .unwrap();

        let tones: Vec<Tone> = results.iter().map(|r| r.tone).collect();
        assert_eq!(tones, vec![Tone::Soft, Tone::Standard, Tone::Short]);
        assert_eq!(captured.hits.load(Ordering::SeqCst), 1);
        assert_eq!(
            captured.path.lock().unwrap().as_deref(),
            Some("/v1beta/models/gemini-test:generateContent")
        );
        assert_eq!(captured.api_key.lock().unwrap().as_deref(), Some("test-key"));

        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(
            body.pointer("/systemInstruction/parts/0/text").and_then(Value::as_str),
            Some(SYSTEM_INSTRUCTION)
        );
        assert_eq!(
            body.pointer("/generationConfig/responseMimeType").and_then(Value::as_str),
            Some("application/json")
        );
        assert_eq!(
            body.pointer("/generationConfig/responseSchema/items/required"),
            Some(&json!(["type", "text"]))
        );
        assert_eq!(
            body.pointer("/contents/0/parts/0/text").and_then(Value::as_str),
            Some("【関係性】: 上司\n【下書き】: 明日の会議、少し遅れます")
        );
    }

    #[tokio::test]
    async fn test_reply_prompt_carries_received_message() {
        let (base_url, captured) = spawn_mock(200, candidate_with_text(VALID_VARIANTS)).await;
        let received = "おつかれ〜！明日の会議って何時からだっけ？😂";
        let request = RewriteRequest::new(Mode::Reply, "10時から", Relationship::FriendlyBoss)
            .with_received_message(received);

        generator(Some("test-key"), &base_url)
            .generate(&request)
            .await
            .unwrap();

        let body = captured.body.lock().unwrap().clone().unwrap();
        let prompt = body
            .pointer("/contents/0/parts/0/text")
            .and_then(Value::as_str)
            .unwrap();
        assert!(prompt.contains(received));
        assert!(prompt.contains(nextmsg::domain::services::MIRRORING_INSTRUCTION));
    }

    #[tokio::test]
    async fn test_empty_response() {
        let reply = json!({
            "candidates": [{ "content": { "parts": [] }, "finishReason": "SAFETY" }]
        });
        let (base_url, _) = spawn_mock(200, reply).await;

        let err = generator(Some("test-key"), &base_url)
            .generate(&new_request())
            .await
            .unwrap_err();
        assert!(matches!(err, RewriteError::EmptyResponse));
        assert_eq!(err.to_string(), "No response from AI");
    }

    #[tokio::test]
    async fn test_malformed_text_is_not_echoed() {
        let raw = "Here you go: Soft/Standard/Short";
        let (base_url, _) = spawn_mock(200, candidate_with_text(raw)).await;

        let err = generator(Some("test-key"), &base_url)
            .generate(&new_request())
            .await
            .unwrap_err();
        assert!(matches!(err, RewriteError::MalformedResponse { .. }));
        assert!(!err.to_string().contains(raw));
    }

    #[tokio::test]
    async fn test_unparseable_envelope_is_malformed() {
        let raw = "<html>upstream proxy page</html>";
        let app = Router::new().route("/v1beta/models/*rest", post(move || async move { raw }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let err = generator(Some("test-key"), &format!("http://{}/v1beta", addr))
            .generate(&new_request())
            .await
            .unwrap_err();

        match &err {
            RewriteError::MalformedResponse { reason } => {
                assert!(reason.starts_with("response envelope"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!err.to_string().contains(raw));
    }

    #[tokio::test]
    async fn test_http_errors_map_to_service_error() {
        let (base_url, _) = spawn_mock(
            500,
            json!({ "error": { "code": 500, "message": "backend exploded" } }),
        )
        .await;
        let err = generator(Some("test-key"), &base_url)
            .generate(&new_request())
            .await
            .unwrap_err();
        assert!(matches!(err, RewriteError::Service(_)));
        assert!(err.to_string().contains("backend exploded"));

        let (base_url, _) = spawn_mock(
            429,
            json!({ "error": { "code": 429, "message": "quota" } }),
        )
        .await;
        let err = generator(Some("test-key"), &base_url)
            .generate(&new_request())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Rate limited"));
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let payload = json!({
            "candidates": [{ "content": { "parts": [{ "text": "[{\"a\":" }, { "text": "1}]" }] } }]
        });
        assert_eq!(extract_text(&payload).as_deref(), Some("[{\"a\":1}]"));
        assert_eq!(extract_text(&json!({})), None);
    }
}
