//! Domain Entities
//!
//! Request-scoped models; nothing here is persisted.
//! - RewriteRequest: one relationship's rewrite input
//! - RewriteResult: one tonal variant

mod rewrite;

pub use rewrite::*;
