//! Gemini `generateContent` client.
//!
//! Thin HTTP wrapper for `POST {base}/models/{model}:generateContent`.
//! Request building and response parsing are pure functions for
//! testability.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::config::AdvisorTimeouts;
use super::prompt;
use super::types::{AdvisorError, ImageRef, Verdict};
use crate::chat::options::{Budget, Mood};

const API_KEY_HEADER: &str = "x-goog-api-key";
const JSON_MIME: &str = "application/json";
const VISUALIZE_ASPECT_RATIO: &str = "1:1";
const FALLBACK_IMAGE_MIME: &str = "image/png";

// =============================================================================
// CLIENT
// =============================================================================

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String, timeouts: AdvisorTimeouts) -> Result<Self, AdvisorError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| AdvisorError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url })
    }

    pub async fn analyze(
        &self,
        model: &str,
        image: &ImageRef,
        budget: Budget,
        mood: Mood,
    ) -> Result<Verdict, AdvisorError> {
        let data = image.to_base64();
        let text = prompt::analyze_prompt(budget, mood);
        let body = analyze_request(image.mime_type(), &data, &text);
        let raw = self.generate(model, &body).await?;
        parse_verdict_response(&raw)
    }

    pub async fn visualize(
        &self,
        model: &str,
        image: &ImageRef,
        verdict: &Verdict,
        mood: Mood,
    ) -> Result<ImageRef, AdvisorError> {
        let data = image.to_base64();
        let text = prompt::visualize_prompt(verdict, mood);
        let body = visualize_request(image.mime_type(), &data, &text);
        let raw = self.generate(model, &body).await?;
        parse_image_response(&raw)
    }

    async fn generate(&self, model: &str, body: &GenerateRequest<'_>) -> Result<String, AdvisorError> {
        let response = self
            .http
            .post(endpoint(&self.base_url, model))
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AdvisorError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AdvisorError::ApiRequest(e.to_string()))?;

        if status != 200 {
            return Err(AdvisorError::ApiResponse { status, body: text });
        }
        Ok(text)
    }
}

fn endpoint(base_url: &str, model: &str) -> String {
    let model = model.trim();
    if model.starts_with("models/") {
        format!("{base_url}/{model}:generateContent")
    } else {
        format!("{base_url}/models/{model}:generateContent")
    }
}

// =============================================================================
// WIRE TYPES: REQUEST
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 2],
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataOut<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataOut<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: &'static str,
}

fn image_then_text<'a>(mime_type: &'a str, data: &'a str, text: &'a str) -> [RequestContent<'a>; 1] {
    [RequestContent {
        parts: [
            RequestPart::Inline { inline_data: InlineDataOut { mime_type, data } },
            RequestPart::Text { text },
        ],
    }]
}

fn analyze_request<'a>(mime_type: &'a str, data: &'a str, text: &'a str) -> GenerateRequest<'a> {
    GenerateRequest {
        contents: image_then_text(mime_type, data, text),
        generation_config: GenerationConfig {
            response_mime_type: Some(JSON_MIME),
            response_schema: Some(prompt::verdict_response_schema()),
            ..Default::default()
        },
    }
}

fn visualize_request<'a>(mime_type: &'a str, data: &'a str, text: &'a str) -> GenerateRequest<'a> {
    GenerateRequest {
        contents: image_then_text(mime_type, data, text),
        generation_config: GenerationConfig {
            image_config: Some(ImageConfig { aspect_ratio: VISUALIZE_ASPECT_RATIO }),
            ..Default::default()
        },
    }
}

// =============================================================================
// WIRE TYPES: RESPONSE
// =============================================================================

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    #[serde(alias = "inline_data")]
    inline_data: Option<InlineDataIn>,
    /// Thought summaries are not part of the answer.
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataIn {
    #[serde(alias = "mime_type")]
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

// =============================================================================
// PARSING
// =============================================================================

fn first_candidate_parts(json: &str) -> Result<Vec<ResponsePart>, AdvisorError> {
    let api: GenerateResponse = serde_json::from_str(json).map_err(|e| AdvisorError::ApiParse(e.to_string()))?;
    Ok(api
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .unwrap_or_default())
}

fn parse_verdict_response(json: &str) -> Result<Verdict, AdvisorError> {
    let text: String = first_candidate_parts(json)?
        .into_iter()
        .filter(|p| !p.thought)
        .filter_map(|p| p.text)
        .collect();
    let body = strip_code_fence(&text);
    if body.is_empty() {
        return Err(AdvisorError::EmptyResponse("no verdict text"));
    }
    serde_json::from_str(body).map_err(|e| AdvisorError::ApiParse(format!("verdict: {e}")))
}

fn parse_image_response(json: &str) -> Result<ImageRef, AdvisorError> {
    let inline = first_candidate_parts(json)?
        .into_iter()
        .filter_map(|p| p.inline_data)
        .find(|d| !d.data.is_empty())
        .ok_or(AdvisorError::EmptyResponse("no image part"))?;
    let bytes = BASE64
        .decode(inline.data.as_bytes())
        .map_err(|e| AdvisorError::ApiParse(format!("image data: {e}")))?;
    let mime_type = inline
        .mime_type
        .filter(|m| m.starts_with("image/"))
        .unwrap_or_else(|| FALLBACK_IMAGE_MIME.to_string());
    Ok(ImageRef::new(mime_type, bytes))
}

/// Models occasionally wrap JSON in a markdown fence despite the MIME hint.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
