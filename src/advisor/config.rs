//! Advisor configuration parsed from environment variables.

use super::types::AdvisorError;
use crate::config::env_parse;

pub const DEFAULT_ADVISOR_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_ANALYZE_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_ADVISOR_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_ADVISOR_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvisorTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorConfig {
    pub api_key: String,
    pub base_url: String,
    pub analyze_model: String,
    pub image_model: String,
    pub timeouts: AdvisorTimeouts,
}

impl AdvisorConfig {
    /// Build typed advisor config from environment variables.
    ///
    /// Required:
    /// - `ADVISOR_API_KEY_ENV` (names the env var containing the key)
    ///
    /// Optional:
    /// - `ADVISOR_BASE_URL`: Gemini API base URL
    /// - `ADVISOR_ANALYZE_MODEL`: default `gemini-3-flash-preview`
    /// - `ADVISOR_IMAGE_MODEL`: default `gemini-2.5-flash-image`
    /// - `ADVISOR_REQUEST_TIMEOUT_SECS`: default 120
    /// - `ADVISOR_CONNECT_TIMEOUT_SECS`: default 10
    pub fn from_env() -> Result<Self, AdvisorError> {
        let key_var = std::env::var("ADVISOR_API_KEY_ENV")
            .map_err(|_| AdvisorError::MissingApiKey { var: "ADVISOR_API_KEY_ENV".into() })?;
        let api_key = std::env::var(&key_var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AdvisorError::MissingApiKey { var: key_var.clone() })?;

        let base_url = std::env::var("ADVISOR_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_ADVISOR_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AdvisorError::ConfigParse(format!("ADVISOR_BASE_URL must be an http(s) URL: {base_url}")));
        }

        let analyze_model = model_var("ADVISOR_ANALYZE_MODEL", DEFAULT_ANALYZE_MODEL);
        let image_model = model_var("ADVISOR_IMAGE_MODEL", DEFAULT_IMAGE_MODEL);
        let timeouts = AdvisorTimeouts {
            request_secs: env_parse("ADVISOR_REQUEST_TIMEOUT_SECS", DEFAULT_ADVISOR_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("ADVISOR_CONNECT_TIMEOUT_SECS", DEFAULT_ADVISOR_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_key, base_url, analyze_model, image_model, timeouts })
    }
}

fn model_var(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
