//! Gemini backend for the Generative Language API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    CommentaryConfig, CommentaryError, CommentaryResult, CommentaryService, EvolutionProfile,
};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// generateContent request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

/// generateContent response.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

/// Commentary from Google's Gemini models.
///
/// # Example
///
/// ```rust,ignore
/// use bio_snake::commentary::{CommentaryConfig, GeminiCommentary};
///
/// let backend = GeminiCommentary::from_env(CommentaryConfig::default())?;
/// let profile = backend.evolution_profile(20, 35).await?;
/// ```
pub struct GeminiCommentary {
    api_key: String,
    config: CommentaryConfig,
    client: reqwest::Client,
}

impl GeminiCommentary {
    /// Create a new Gemini backend.
    pub fn new(api_key: impl Into<String>, config: CommentaryConfig) -> CommentaryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            api_key: api_key.into(),
            config,
            client,
        })
    }

    /// Create from the environment variable named in the config.
    pub fn from_env(config: CommentaryConfig) -> CommentaryResult<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(CommentaryError::Unavailable)?;
        Self::new(api_key, config)
    }

    async fn generate(&self, prompt: String, json: bool) -> CommentaryResult<String> {
        let request = GenerateRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: json.then(|| GenerationConfig {
                response_mime_type: "application/json".to_string(),
            }),
        };

        let url = format!("{}/{}:generateContent", GEMINI_API_BASE, self.config.model);
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CommentaryError::Timeout(self.config.timeout_secs)
                } else {
                    CommentaryError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CommentaryError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CommentaryError::InvalidResponse(e.to_string()))?;
        extract_text(body)
    }
}

#[async_trait]
impl CommentaryService for GeminiCommentary {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn evolution_profile(
        &self,
        length_stat: u32,
        score: u32,
    ) -> CommentaryResult<EvolutionProfile> {
        let prompt = format!(
            "The snake has reached a length of {length_stat} units and a score of {score}. \
             Generate a realistic biological profile for this evolving organism. \
             Return a JSON object containing speciesName (creative biological name), \
             fact (a short interesting fact), and traits (array of 3 traits)."
        );
        let text = self.generate(prompt, true).await?;
        parse_profile(&text)
    }

    async fn obituary(&self, score: u32, length_stat: u32) -> CommentaryResult<String> {
        let prompt = format!(
            "A snake simulation just ended. Score: {score}, Max Length: {length_stat}. \
             Write a single, very short, slightly poetic or philosophical obituary for this creature."
        );
        self.generate(prompt, false).await
    }
}

fn extract_text(response: GenerateResponse) -> CommentaryResult<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(CommentaryError::InvalidResponse(
            "response had no text".to_string(),
        ));
    }
    Ok(text.to_string())
}

/// Parse a profile, tolerating a markdown code fence around the JSON
fn parse_profile(text: &str) -> CommentaryResult<EvolutionProfile> {
    let trimmed = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let profile: EvolutionProfile = serde_json::from_str(trimmed)
        .map_err(|e| CommentaryError::InvalidResponse(e.to_string()))?;

    if profile.species_name.trim().is_empty() {
        return Err(CommentaryError::InvalidResponse(
            "empty species name".to_string(),
        ));
    }
    Ok(profile)
}
