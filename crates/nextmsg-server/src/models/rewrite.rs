//! Rewrite request/response DTOs
//!
//! Request fields are optional: absence is reported as a 400 with
//! a fixed message rather than a deserialization failure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use nextmsg::{ResultAggregate, RewriteResult};

/// Single-relationship rewrite request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RewriteBody {
    /// "new" or "reply"
    #[schema(example = "reply")]
    pub mode: Option<String>,
    /// Rough draft to rewrite
    #[schema(example = "明日の飲み会、遅れて参加します")]
    pub draft: Option<String>,
    /// Relationship label (e.g. "上司") or slug (e.g. "boss")
    #[schema(example = "仲の良い上司")]
    pub relationship: Option<String>,
    /// Message being replied to (reply mode)
    pub received_message: Option<String>,
}

/// Multi-relationship rewrite request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchRewriteBody {
    pub mode: Option<String>,
    pub draft: Option<String>,
    pub received_message: Option<String>,
    pub relationships: Option<Vec<String>>,
}

/// One tonal variant
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VariantResponse {
    /// Soft, Standard, or Short
    #[serde(rename = "type")]
    pub tone: String,
    pub text: String,
}

impl From<RewriteResult> for VariantResponse {
    fn from(result: RewriteResult) -> Self {
        Self {
            tone: result.tone.to_string(),
            text: result.text,
        }
    }
}

/// Variants keyed by relationship label
#[derive(Debug, Serialize, ToSchema)]
pub struct BatchRewriteResponse {
    pub results: BTreeMap<String, Vec<VariantResponse>>,
}

impl From<ResultAggregate> for BatchRewriteResponse {
    fn from(aggregate: ResultAggregate) -> Self {
        Self {
            results: aggregate
                .into_iter()
                .map(|(relationship, variants)| {
                    (
                        relationship.label().to_string(),
                        variants.into_iter().map(Into::into).collect(),
                    )
                })
                .collect(),
        }
    }
}

/// Error body for every non-2xx response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
