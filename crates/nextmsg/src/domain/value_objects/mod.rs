//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod mode;
mod relationship;
mod tone;

pub use mode::*;
pub use relationship::*;
pub use tone::*;
