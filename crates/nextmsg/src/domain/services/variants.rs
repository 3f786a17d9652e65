//! Variant validation
//!
//! The model is asked for a JSON array of `{type, text}` objects. Nothing on
//! the model side guarantees the shape, so it is checked here: exactly three
//! entries, one per tone, each with non-blank text. Tone labels must match
//! exactly (`Soft`, `Standard`, `Short`); nothing is normalised, so the
//! variants are passed on as emitted, in the order emitted.

use std::collections::HashSet;

use serde::Deserialize;

use crate::domain::entities::RewriteResult;
use crate::domain::errors::RewriteError;
use crate::domain::value_objects::Tone;

#[derive(Deserialize)]
struct RawVariant {
    #[serde(rename = "type")]
    tone: String,
    text: String,
}

/// Parse and validate the model's JSON text
pub fn parse_variants(raw: &str) -> Result<Vec<RewriteResult>, RewriteError> {
    let variants: Vec<RawVariant> = serde_json::from_str(raw.trim())
        .map_err(|e| RewriteError::malformed(format!("not a variant array: {}", e)))?;

    validate_variants(variants.into_iter().map(|v| (v.tone, v.text)))
}

fn validate_variants(
    variants: impl IntoIterator<Item = (String, String)>,
) -> Result<Vec<RewriteResult>, RewriteError> {
    let mut seen = HashSet::new();
    let mut results = Vec::with_capacity(Tone::ALL.len());

    for (tone, text) in variants {
        let tone: Tone = tone.parse().map_err(RewriteError::malformed)?;

        if !seen.insert(tone) {
            return Err(RewriteError::malformed(format!("duplicate tone: {}", tone)));
        }
        if text.trim().is_empty() {
            return Err(RewriteError::malformed(format!("empty text for tone {}", tone)));
        }

        results.push(RewriteResult::new(tone, text));
    }

    if results.len() != Tone::ALL.len() {
        return Err(RewriteError::malformed(format!(
            "expected {} variants, got {}",
            Tone::ALL.len(),
            results.len()
        )));
    }

    Ok(results)
}
