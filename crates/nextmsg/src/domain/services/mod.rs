//! Domain Services
//!
//! Pure functions shared by every generator implementation.

pub mod prompt;
pub mod variants;

pub use prompt::{build_prompt, MIRRORING_INSTRUCTION, SYSTEM_INSTRUCTION};
pub use variants::parse_variants;
