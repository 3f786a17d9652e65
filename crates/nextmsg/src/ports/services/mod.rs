//! Service Ports
//!
//! Abstract interfaces for external services.

mod rewrite_generator;

pub use rewrite_generator::*;
