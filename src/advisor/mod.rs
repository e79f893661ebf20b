//! Advisor: the external generative service behind analyze and visualize.
//!
//! DESIGN
//! ======
//! The session runner only sees the [`Advisor`] trait. `GeminiAdvisor` is the
//! production implementation, configured from environment variables and
//! pinned to one model per call kind.

pub mod config;
pub mod gemini;
pub mod prompt;
pub mod types;

use config::AdvisorConfig;
pub use types::Advisor;
use types::{AdvisorError, ImageRef, Verdict};

use crate::chat::options::{Budget, Mood};

// =============================================================================
// GEMINI ADVISOR
// =============================================================================

/// Production advisor backed by the Gemini `generateContent` API.
///
/// Configured from environment variables by [`GeminiAdvisor::from_env`].
pub struct GeminiAdvisor {
    client: gemini::GeminiClient,
    analyze_model: String,
    image_model: String,
}

impl GeminiAdvisor {
    /// Build an advisor from environment variables.
    ///
    /// - `ADVISOR_API_KEY_ENV`: name of env var holding the API key (e.g. `GEMINI_API_KEY`)
    /// - `ADVISOR_ANALYZE_MODEL` / `ADVISOR_IMAGE_MODEL`: model names
    /// - `ADVISOR_BASE_URL`: custom base URL
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, AdvisorError> {
        Self::from_config(AdvisorConfig::from_env()?)
    }

    /// Build an advisor from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: AdvisorConfig) -> Result<Self, AdvisorError> {
        let client = gemini::GeminiClient::new(config.api_key, config.base_url, config.timeouts)?;
        Ok(Self { client, analyze_model: config.analyze_model, image_model: config.image_model })
    }

    #[must_use]
    pub fn analyze_model(&self) -> &str {
        &self.analyze_model
    }

    #[must_use]
    pub fn image_model(&self) -> &str {
        &self.image_model
    }
}

#[async_trait::async_trait]
impl Advisor for GeminiAdvisor {
    async fn analyze(&self, image: &ImageRef, budget: Budget, mood: Mood) -> Result<Verdict, AdvisorError> {
        self.client
            .analyze(&self.analyze_model, image, budget, mood)
            .await
    }

    async fn visualize(&self, image: &ImageRef, verdict: &Verdict, mood: Mood) -> Result<ImageRef, AdvisorError> {
        self.client
            .visualize(&self.image_model, image, verdict, mood)
            .await
    }
}
