use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::domain::error::DomainError;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Opaque text generation: system prompt and user prompt in, text out.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, system_prompt: &str, prompt: &str) -> Result<String, DomainError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
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
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }
}

/// Client for the Generative Language `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate(&self, system_prompt: &str, prompt: &str) -> Result<String, DomainError> {
        let body = GenerateRequest {
            contents: vec![
                Content {
                    role: "user",
                    parts: vec![RequestPart {
                        text: system_prompt,
                    }],
                },
                Content {
                    role: "user",
                    parts: vec![RequestPart { text: prompt }],
                },
            ],
        };

        // The key travels in a header so it never ends up in a URL that
        // reqwest echoes back inside its errors.
        let resp = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!("generation request failed: {}", e);
                DomainError::Upstream(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            error!(status = status.as_u16(), detail = %detail, "generation service rejected request");
            return Err(DomainError::Upstream(format!(
                "generation service responded with status {}",
                status.as_u16()
            )));
        }

        let parsed: GenerateResponse = resp.json().await.map_err(|e| {
            let e = e.without_url();
            error!("unreadable generation response: {}", e);
            DomainError::Upstream(format!("unreadable generation response: {e}"))
        })?;

        let text = parsed
            .into_text()
            .ok_or_else(|| DomainError::Upstream("generation service returned no text".into()))?;
        info!(model = %self.model, chars = text.len(), "content generated");
        Ok(text)
    }
}

/// Canned generator for tests; records every prompt pair it receives.
#[cfg(test)]
#[derive(Clone)]
pub struct StaticGenerator {
    reply: Result<String, String>,
    prompts: std::sync::Arc<parking_lot::Mutex<Vec<(String, String)>>>,
}

#[cfg(test)]
impl StaticGenerator {
    pub fn text(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Default::default(),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            reply: Err(reason.to_string()),
            prompts: Default::default(),
        }
    }

    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl ContentGenerator for StaticGenerator {
    async fn generate(&self, system_prompt: &str, prompt: &str) -> Result<String, DomainError> {
        self.prompts
            .lock()
            .push((system_prompt.to_string(), prompt.to_string()));
        self.reply.clone().map_err(DomainError::Upstream)
    }
}
