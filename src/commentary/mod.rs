//! Flavor text for evolutions and deaths
//!
//! The simulation talks to a [`CommentaryService`] only through the
//! [`CommentaryBroker`], which runs every request in the background, tags it
//! with the run's epoch, and swaps in a canned fallback whenever a backend
//! fails or times out.

pub mod broker;
pub mod gemini;
pub mod offline;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use broker::{CommentaryBroker, CommentaryReply, ReplyKind};
pub use gemini::GeminiCommentary;
pub use offline::OfflineCommentary;

pub const FALLBACK_SPECIES: &str = "Hyper-Adaptive Serpent";
pub const FALLBACK_FACT: &str =
    "This organism adapts its cellular structure in real-time to survive increasing complexity.";
pub const FALLBACK_TRAITS: [&str; 3] = ["Increased Reflexes", "Luminescent Scales", "Thermo-Vision"];
pub const FALLBACK_OBITUARY: &str =
    "The cycle of nature continues. Your journey has reached its natural conclusion.";

/// Commentary-related errors.
#[derive(Debug, Error)]
pub enum CommentaryError {
    #[error("commentary backend unavailable")]
    Unavailable,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),
}

/// Result type for commentary operations.
pub type CommentaryResult<T> = Result<T, CommentaryError>;

/// A generated biological profile for a newly evolved organism
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionProfile {
    pub species_name: String,
    pub fact: String,
    pub traits: Vec<String>,
}

impl EvolutionProfile {
    /// The canned profile shown when no backend answers
    pub fn fallback() -> Self {
        Self {
            species_name: FALLBACK_SPECIES.to_string(),
            fact: FALLBACK_FACT.to_string(),
            traits: FALLBACK_TRAITS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Settings for the commentary backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentaryConfig {
    /// Model identifier passed to the backend
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Give up on a request after this many seconds
    pub timeout_secs: u64,
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Source of AI-generated flavor text
#[async_trait]
pub trait CommentaryService: Send + Sync {
    /// Get the backend name.
    fn name(&self) -> &str;

    /// Describe the species the organism has evolved into.
    async fn evolution_profile(
        &self,
        length_stat: u32,
        score: u32,
    ) -> CommentaryResult<EvolutionProfile>;

    /// A short obituary for a finished run.
    async fn obituary(&self, score: u32, length_stat: u32) -> CommentaryResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_profile() {
        let profile = EvolutionProfile::fallback();
        assert_eq!(profile.species_name, "Hyper-Adaptive Serpent");
        assert_eq!(profile.traits.len(), 3);
    }

    #[test]
    fn test_profile_parses_camel_case() {
        let json = r#"{"speciesName":"Dune Sidewinder","fact":"Moves sideways.","traits":["a","b","c"]}"#;
        let profile: EvolutionProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.species_name, "Dune Sidewinder");
        assert_eq!(profile.traits, vec!["a", "b", "c"]);
    }
}
