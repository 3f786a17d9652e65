//! Mode - Fresh composition or reply

use serde::{Deserialize, Serialize};

/// Rewrite mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Compose a new message from the draft
    #[default]
    New,
    /// Reply to a received message
    Reply,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::New => write!(f, "new"),
            Mode::Reply => write!(f, "reply"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(Mode::New),
            "reply" => Ok(Mode::Reply),
            _ => Err(format!("Unknown mode: {}", s)),
        }
    }
}
