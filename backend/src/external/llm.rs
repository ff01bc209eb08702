//! Generative model client
//!
//! Advisory flows talk to a [`LanguageModel`]; production uses Google's
//! Gemini `generateContent` endpoint with JSON output mode.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{AppError, AppResult};
use shared::{ChatMessage, ChatRole};

/// Base64 image sent alongside the prompt
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

/// A single model invocation
#[derive(Debug, Clone, Default)]
pub struct ModelRequest {
    pub system: Option<String>,
    /// Earlier conversation turns, oldest first
    pub history: Vec<ChatMessage>,
    pub prompt: String,
    pub image: Option<InlineImage>,
    /// Ask the model for a bare JSON document
    pub json_output: bool,
}

impl ModelRequest {
    pub fn json(prompt: String) -> Self {
        Self {
            prompt,
            json_output: true,
            ..Default::default()
        }
    }
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, request: ModelRequest) -> AppResult<String>;
}

/// Gemini API client
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Inline {
        inline_data: GeminiBlob,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiBlob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, base_url: String, timeout_secs: u64) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// None when no API key is configured
    pub fn from_config(config: &LlmConfig) -> AppResult<Option<Self>> {
        if config.api_key.trim().is_empty() {
            return Ok(None);
        }
        Self::new(
            config.api_key.clone(),
            config.model.clone(),
            config.base_url.clone(),
            config.timeout_secs,
        )
        .map(Some)
    }

    fn build_request(request: ModelRequest) -> GeminiRequest {
        let mut contents: Vec<GeminiContent> = request
            .history
            .into_iter()
            .map(|m| GeminiContent {
                role: Some(match m.role {
                    ChatRole::User => "user",
                    ChatRole::Model => "model",
                }),
                parts: vec![GeminiPart::Text { text: m.content }],
            })
            .collect();

        let mut parts = vec![GeminiPart::Text {
            text: request.prompt,
        }];
        if let Some(image) = request.image {
            parts.push(GeminiPart::Inline {
                inline_data: GeminiBlob {
                    mime_type: image.mime_type,
                    data: image.data,
                },
            });
        }
        contents.push(GeminiContent {
            role: Some("user"),
            parts,
        });

        GeminiRequest {
            contents,
            system_instruction: request.system.map(|text| GeminiContent {
                role: None,
                parts: vec![GeminiPart::Text { text }],
            }),
            generation_config: request.json_output.then(|| GeminiGenerationConfig {
                response_mime_type: "application/json".to_string(),
            }),
        }
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, request: ModelRequest) -> AppResult<String> {
        let body = Self::build_request(request);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        tracing::debug!("Calling Gemini model {}", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Gemini API error: {} - {}",
                status, body
            )));
        }

        let data: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AppError::AiOutput(format!("Failed to parse Gemini response: {}", e)))?;

        let text: String = data
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AppError::AiOutput("model returned no content".to_string()));
        }
        Ok(text)
    }
}
