//! Rewrite request and result entities

use serde::{Deserialize, Serialize};

use crate::domain::errors::RewriteError;
use crate::domain::value_objects::{Mode, Relationship, Tone};

/// Message shown for any absent required field
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields: mode, draft, relationship";

/// One rewritten variant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RewriteResult {
    #[serde(rename = "type")]
    pub tone: Tone,
    pub text: String,
}

impl RewriteResult {
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

/// A validated request for one relationship
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRequest {
    pub mode: Mode,
    pub draft: String,
    pub relationship: Relationship,
    pub received_message: Option<String>,
}

impl RewriteRequest {
    pub fn new(mode: Mode, draft: impl Into<String>, relationship: Relationship) -> Self {
        Self {
            mode,
            draft: draft.into(),
            relationship,
            received_message: None,
        }
    }

    /// Attach the message being replied to. Empty text is treated as absent.
    pub fn with_received_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.received_message = (!message.is_empty()).then_some(message);
        self
    }

    /// Build a request from loosely-typed transport fields.
    ///
    /// `mode`, `draft` and `relationship` must be present and non-empty.
    /// A reply without a received message is accepted; the prompt simply
    /// leaves it out.
    pub fn from_parts(
        mode: Option<&str>,
        draft: Option<&str>,
        relationship: Option<&str>,
        received_message: Option<&str>,
    ) -> Result<Self, RewriteError> {
        let (Some(mode), Some(draft), Some(relationship)) = (
            mode.filter(|s| !s.is_empty()),
            draft.filter(|s| !s.is_empty()),
            relationship.filter(|s| !s.is_empty()),
        ) else {
            return Err(RewriteError::validation(MISSING_FIELDS_MESSAGE));
        };

        let mode: Mode = mode.parse().map_err(RewriteError::Validation)?;
        let relationship: Relationship = relationship.parse().map_err(RewriteError::Validation)?;

        let request = Self::new(mode, draft, relationship);
        Ok(match received_message {
            Some(message) => request.with_received_message(message),
            None => request,
        })
    }

    /// Received message, only when it should shape the prompt
    pub fn reply_context(&self) -> Option<&str> {
        match self.mode {
            Mode::Reply => self.received_message.as_deref(),
            Mode::New => None,
        }
    }
}
