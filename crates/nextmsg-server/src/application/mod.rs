//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! the HTTP layer and the generation client.

mod rewrite_service;

pub use rewrite_service::{RewriteService, MISSING_BATCH_FIELDS_MESSAGE};
