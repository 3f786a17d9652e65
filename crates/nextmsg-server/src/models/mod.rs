//! NextMsg Data Models
//!
//! - Rewrite: single-relationship request and variants
//! - Batch: multi-relationship request and keyed results

mod rewrite;

pub use rewrite::*;
