//! Relationship - Social distance to the message recipient

use serde::{Deserialize, Serialize};

/// Relationship to the recipient
///
/// Serialized with the product's display labels. English slugs are accepted
/// when parsing so terminal users don't have to type the labels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Relationship {
    #[serde(rename = "上司")]
    Boss,
    #[serde(rename = "仲の良い上司")]
    FriendlyBoss,
    #[serde(rename = "友達")]
    Friend,
    #[serde(rename = "親友")]
    BestFriend,
    #[serde(rename = "初対面")]
    Stranger,
    #[serde(rename = "知り合い")]
    Acquaintance,
    #[serde(rename = "知り合い以上友達未満")]
    AlmostFriend,
}

impl Relationship {
    /// Every relationship, in selector order
    pub const ALL: [Relationship; 7] = [
        Relationship::Boss,
        Relationship::FriendlyBoss,
        Relationship::Friend,
        Relationship::BestFriend,
        Relationship::Stranger,
        Relationship::Acquaintance,
        Relationship::AlmostFriend,
    ];

    /// Label embedded in prompts and used as the wire value
    pub fn label(&self) -> &'static str {
        match self {
            Relationship::Boss => "上司",
            Relationship::FriendlyBoss => "仲の良い上司",
            Relationship::Friend => "友達",
            Relationship::BestFriend => "親友",
            Relationship::Stranger => "初対面",
            Relationship::Acquaintance => "知り合い",
            Relationship::AlmostFriend => "知り合い以上友達未満",
        }
    }

    /// ASCII alias for command-line use
    pub fn slug(&self) -> &'static str {
        match self {
            Relationship::Boss => "boss",
            Relationship::FriendlyBoss => "friendly-boss",
            Relationship::Friend => "friend",
            Relationship::BestFriend => "best-friend",
            Relationship::Stranger => "stranger",
            Relationship::Acquaintance => "acquaintance",
            Relationship::AlmostFriend => "almost-friend",
        }
    }
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Relationship {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        let slug = needle.to_lowercase().replace('_', "-");
        Relationship::ALL
            .into_iter()
            .find(|rel| rel.label() == needle || rel.slug() == slug)
            .ok_or_else(|| format!("Unknown relationship: {}", s))
    }
}
