//! Gemini `generateContent` client
//!
//! One client type serves both the vision captioner (image + prompt) and
//! the recommendation text generator (prompt only); each is configured
//! with its own model and key.

use std::path::Path;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::mime::image_mime_type;
use super::{CollaboratorError, CollaboratorResult, TextGenerator, VisionCaptioner};

const SERVICE: &str = "Gemini API";

/// Client for a single Gemini model
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    /// Config key reported when `api_key` is missing
    key_setting: &'static str,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    InlineData { inline_data: InlineData },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(
        client: Client,
        api_key: Option<String>,
        base_url: String,
        model: String,
        key_setting: &'static str,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            key_setting,
        }
    }

    fn api_key(&self) -> CollaboratorResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| CollaboratorError::missing_key(self.key_setting))
    }

    /// Send parts to `models/{model}:generateContent` and return the text
    async fn generate_content(
        &self,
        api_key: &str,
        parts: Vec<Part<'_>>,
    ) -> CollaboratorResult<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CollaboratorError::upstream(SERVICE, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CollaboratorError::Upstream {
                service: SERVICE,
                detail: format!("API returned {}: {}", status, body),
            });
        }

        let data: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::invalid_response(SERVICE, e))?;

        response_text(data)
    }
}

/// Concatenate the text parts of the first candidate
fn response_text(data: GenerateContentResponse) -> CollaboratorResult<String> {
    let text: String = data
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(CollaboratorError::InvalidResponse {
            service: SERVICE,
            detail: "response contained no text".to_string(),
        });
    }
    Ok(text)
}

#[async_trait]
impl VisionCaptioner for GeminiClient {
    async fn caption(&self, image_path: &Path, prompt: &str) -> CollaboratorResult<String> {
        let api_key = self.api_key()?;

        let mime_type = image_mime_type(image_path)
            .ok_or_else(|| CollaboratorError::UnsupportedMedia(image_path.display().to_string()))?;

        let image_data = tokio::fs::read(image_path)
            .await
            .map_err(|e| CollaboratorError::io(image_path, e))?;

        tracing::debug!(
            "Captioning {} ({} bytes, {}) with {}",
            image_path.display(),
            image_data.len(),
            mime_type,
            self.model
        );

        let parts = vec![
            Part::InlineData {
                inline_data: InlineData {
                    mime_type,
                    data: BASE64.encode(&image_data),
                },
            },
            Part::Text { text: prompt },
        ];
        self.generate_content(api_key, parts).await
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> CollaboratorResult<String> {
        let api_key = self.api_key()?;
        self.generate_content(api_key, vec![Part::Text { text: prompt }])
            .await
    }
}
