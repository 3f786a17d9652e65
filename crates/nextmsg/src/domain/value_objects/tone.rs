//! Tone - Stylistic register of a rewritten message

use serde::{Deserialize, Serialize};

/// One of the three registers every rewrite must come back in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Polite without being stiff
    Soft,
    /// The natural distance for the relationship
    Standard,
    /// Gets to the point, not cold
    Short,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Soft, Tone::Standard, Tone::Short];
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tone::Soft => write!(f, "Soft"),
            Tone::Standard => write!(f, "Standard"),
            Tone::Short => write!(f, "Short"),
        }
    }
}

impl std::str::FromStr for Tone {
    type Err = String;

    /// Exact label only, so a parsed tone always re-serializes unchanged
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Soft" => Ok(Tone::Soft),
            "Standard" => Ok(Tone::Standard),
            "Short" => Ok(Tone::Short),
            _ => Err(format!("Unknown tone: {}", s)),
        }
    }
}
