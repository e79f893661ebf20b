//! Advisor types: verdict schema, image references, errors.
//!
//! The verdict schema has two observed shapes: a minimal five-field record
//! and a richer one with an itemized cost breakup. Both deserialize into
//! [`Verdict`]; the extra fields are optional.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::chat::options::{Budget, Mood};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by advisor client operations.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The provider answered without the expected text or image part.
    #[error("empty response: {0}")]
    EmptyResponse(&'static str),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::error::ErrorCode for AdvisorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::EmptyResponse(_) => "E_EMPTY_RESPONSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// VERDICT
// =============================================================================

/// One itemized line of the cost breakup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakupItem {
    pub item: String,
    pub cost: String,
}

/// Structured advisory result for one room photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Short assessment.
    pub verdict: String,
    /// Display string for the total cost range.
    pub estimated_cost: String,
    pub worth_fixing: Vec<String>,
    pub avoid_spending_on: Vec<String>,
    pub reasoning: String,
    /// Cost range when labor is negotiated or items are reused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ultra_budget_cost: Option<String>,
    /// Designer take, e.g. "White paint + warm lighting = 70% transformation".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation_logic: Option<String>,
    /// Absent and `null` both read as an empty list.
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub breakup: Vec<BreakupItem>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Verdict {
    /// Improvements joined into a single guidance line for image synthesis.
    #[must_use]
    pub fn guidance(&self) -> String {
        self.worth_fixing.join(", ")
    }
}

// =============================================================================
// IMAGE REFERENCE
// =============================================================================

/// Opaque in-memory image: MIME type plus raw bytes.
///
/// Cloning shares the byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl ImageRef {
    #[must_use]
    pub fn new(mime_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self { mime_type: mime_type.into(), bytes: bytes.into() }
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    /// Inline-renderable `data:` URL.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

impl Serialize for ImageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.data_url())
    }
}

// =============================================================================
// ADVISOR TRAIT
// =============================================================================

/// Provider-neutral async advisor. Enables mocking in tests.
///
/// Each call is a single request with no internal retry.
#[async_trait::async_trait]
pub trait Advisor: Send + Sync {
    /// Assess a room photo for the chosen budget tier and mood.
    ///
    /// # Errors
    ///
    /// Returns an [`AdvisorError`] on transport failure, a non-success status,
    /// or a response that does not contain a parseable verdict.
    async fn analyze(&self, image: &ImageRef, budget: Budget, mood: Mood) -> Result<Verdict, AdvisorError>;

    /// Synthesize an "after" image guided by the verdict's improvements.
    ///
    /// # Errors
    ///
    /// Returns an [`AdvisorError`] on transport failure, a non-success status,
    /// or a response without an image part.
    async fn visualize(&self, image: &ImageRef, verdict: &Verdict, mood: Mood) -> Result<ImageRef, AdvisorError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
