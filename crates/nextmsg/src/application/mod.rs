//! Application Layer (Use Cases)
//!
//! Coordinates rewrite generation across relationships.

mod fan_out;

pub use fan_out::{FanOut, FanOutRequest, FanOutSession, ResultAggregate, SubmitOutcome};
