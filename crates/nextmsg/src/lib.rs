//! NextMsg Domain Library
//!
//! Core domain types and interfaces for relationship-aware message rewriting.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain/`): Pure types and logic
//!   - `entities/`: RewriteRequest, RewriteResult
//!   - `value_objects/`: Relationship, Mode, Tone
//!   - `services/`: Prompt construction and variant validation
//!   - `errors/`: RewriteError, FanOutError
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `services/`: RewriteGenerator
//!
//! - **Application** (`application/`): Fan-out across relationships
//!
//! # Usage
//!
//! ```rust,ignore
//! use nextmsg::{FanOut, FanOutRequest, Mode, Relationship};
//!
//! let fan_out = FanOut::new(generator);
//! let request = FanOutRequest::new(Mode::New, "明日休みます", vec![Relationship::Boss]);
//! let aggregate = fan_out.run(&request).await?;
//! ```

pub mod application;
pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use application::{FanOut, FanOutRequest, FanOutSession, ResultAggregate, SubmitOutcome};
pub use domain::{
    FanOutError, Mode, Relationship, RewriteError, RewriteRequest, RewriteResult, Tone,
    MISSING_FIELDS_MESSAGE,
};
pub use ports::RewriteGenerator;
