//! Rewrite Application Service (Use Case)
//!
//! Validates transport input and delegates to the injected generator.

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use nextmsg::{
    FanOut, FanOutError, FanOutRequest, Mode, Relationship, ResultAggregate, RewriteError,
    RewriteGenerator, RewriteRequest, RewriteResult,
};

/// Message shown when a batch is missing required input
pub const MISSING_BATCH_FIELDS_MESSAGE: &str =
    "Missing required fields: mode, draft, relationships";

/// Application service for rewrite operations
pub struct RewriteService {
    generator: Arc<dyn RewriteGenerator>,
    fan_out: FanOut,
}

impl RewriteService {
    pub fn new(generator: Arc<dyn RewriteGenerator>) -> Self {
        Self {
            fan_out: FanOut::new(Arc::clone(&generator)),
            generator,
        }
    }

    /// Rewrite a draft for a single relationship.
    ///
    /// Input is validated before the generator is touched.
    pub async fn rewrite(
        &self,
        mode: Option<&str>,
        draft: Option<&str>,
        relationship: Option<&str>,
        received_message: Option<&str>,
    ) -> Result<Vec<RewriteResult>, RewriteError> {
        let request = RewriteRequest::from_parts(mode, draft, relationship, received_message)
            .map_err(|e| {
                tracing::warn!("Rejected rewrite request: {}", e);
                e
            })?;

        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "rewrite",
            %request_id,
            relationship = %request.relationship,
            mode = %request.mode
        );

        async {
            tracing::info!(
                "✍️  Rewriting via {} ({})",
                self.generator.provider_name(),
                self.generator.model_id()
            );

            match self.generator.generate(&request).await {
                Ok(results) => {
                    tracing::info!("✅ Generated {} variants", results.len());
                    Ok(results)
                }
                Err(e) => {
                    tracing::error!("Error in rewrite: {:?}", e);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Validate a batch request.
    ///
    /// Unlike the single endpoint, a reply batch needs the received message,
    /// since the whole batch is one user submission.
    pub fn batch_request(
        &self,
        mode: Option<&str>,
        draft: Option<&str>,
        received_message: Option<&str>,
        relationships: Option<&[String]>,
    ) -> Result<FanOutRequest, RewriteError> {
        let (Some(mode), Some(draft), Some(relationships)) = (
            mode.filter(|s| !s.is_empty()),
            draft.filter(|s| !s.trim().is_empty()),
            relationships.filter(|r| !r.is_empty()),
        ) else {
            return Err(RewriteError::validation(MISSING_BATCH_FIELDS_MESSAGE));
        };

        let mode: Mode = mode.parse().map_err(RewriteError::Validation)?;
        let relationships = relationships
            .iter()
            .map(|r| r.parse::<Relationship>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(RewriteError::Validation)?;

        let request = FanOutRequest::new(mode, draft, relationships);
        let request = match received_message {
            Some(message) => request.with_received_message(message),
            None => request,
        };

        if !request.is_ready() {
            return Err(RewriteError::validation(
                "receivedMessage is required in reply mode",
            ));
        }

        Ok(request)
    }

    /// Rewrite for every relationship in the batch; any failure fails all
    pub async fn rewrite_batch(
        &self,
        request: &FanOutRequest,
    ) -> Result<Option<ResultAggregate>, FanOutError> {
        let request_id = Uuid::new_v4();
        self.fan_out
            .run(request)
            .instrument(tracing::info_span!("rewrite_batch", %request_id))
            .await
    }
}
