//! Rewrite Generator Port
//!
//! Abstract interface for producing the three tonal variants of a draft.
//! The server implements it against Gemini; the CLI implements it against
//! the server's rewrite endpoint.

use async_trait::async_trait;

use crate::domain::entities::{RewriteRequest, RewriteResult};
use crate::domain::errors::RewriteError;

/// Generation client interface
///
/// One attempt per call: implementations must not retry or cache. The same
/// input may yield different text on each call.
///
/// # Example
///
/// ```rust,ignore
/// use nextmsg::ports::RewriteGenerator;
///
/// struct CannedGenerator;
///
/// #[async_trait]
/// impl RewriteGenerator for CannedGenerator {
///     async fn generate(&self, request: &RewriteRequest)
///         -> Result<Vec<RewriteResult>, RewriteError> {
///         // ...
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait RewriteGenerator: Send + Sync {
    /// Rewrite the draft for one relationship
    async fn generate(&self, request: &RewriteRequest) -> Result<Vec<RewriteResult>, RewriteError>;

    /// Get the provider name (e.g., "gemini", "http")
    fn provider_name(&self) -> &str;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
