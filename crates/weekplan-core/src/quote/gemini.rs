//! Gemini `generateContent` client.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::QuoteProvider;
use crate::config::QuoteConfig;
use crate::error::QuoteError;

const SYSTEM_INSTRUCTION: &str =
    "You are a helpful and inspiring life coach who speaks Persian. Keep quotes under 20 words.";

/// Prompt sent for a task list; a generic start-of-week prompt when empty.
pub fn build_prompt(tasks: &[String]) -> String {
    if tasks.is_empty() {
        "یک جمله انگیزشی کوتاه و الهام‌بخش به زبان فارسی برای شروع هفته بنویس.".to_string()
    } else {
        format!(
            "این لیست کارهای من برای این هفته است: {}. بر اساس این کارها، یک جمله انگیزشی کوتاه و الهام‌بخش به زبان فارسی بنویس که به من انرژی بدهد.",
            tasks.join(", ")
        )
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

pub struct GeminiProvider {
    /// `None` when the client could not be built; every call then fails over
    /// to the fallback quote.
    client: Option<Client>,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
    enabled: bool,
}

impl GeminiProvider {
    /// Build from config, reading the API key from the configured env var.
    pub fn from_config(config: &QuoteConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                warn!(error = %e, timeout_secs = config.timeout_secs, "failed to build HTTP client, quotes will use fallbacks");
            })
            .ok();
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            api_key_env: config.api_key_env.clone(),
            enabled: config.enabled,
        }
    }

    /// Override the API key (tests, or a key from somewhere other than the env).
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    async fn call(&self, tasks: &[String]) -> Result<String, QuoteError> {
        if !self.enabled {
            return Err(QuoteError::Disabled);
        }
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| QuoteError::MissingApiKey(self.api_key_env.clone()))?;
        let client = self.client.as_ref().ok_or(QuoteError::ClientUnavailable)?;

        let body = json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "role": "user", "parts": [{ "text": build_prompt(tasks) }] }],
        });

        let resp = client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(QuoteError::Status(resp.status().as_u16()));
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| QuoteError::Malformed(e.to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        let text = text.trim();
        if text.is_empty() {
            return Err(QuoteError::Malformed("response contained no text".into()));
        }
        Ok(text.to_string())
    }
}

impl QuoteProvider for GeminiProvider {
    async fn generate(&self, tasks: &[String]) -> Result<String, QuoteError> {
        self.call(tasks).await
    }
}
