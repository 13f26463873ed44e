//! Gemini `generateContent` client (non-streaming).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::GenerativeModel;
use flowbit_core::{Error, Result};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Client for Google's Generative Language API.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", API_BASE, self.model)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "contents": [{"parts": [{"text": prompt}]}],
        });

        debug!("Calling model {} ({} prompt chars)", self.model, prompt.len());

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Model(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Model(format!("API error {}: {}", status, body)));
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Model(format!("Malformed response body: {}", e)))?;

        let parts = parsed["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| Error::Model("Response has no candidate parts".to_string()))?;

        let text: String = parts
            .iter()
            .filter_map(|p| p["text"].as_str())
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(Error::Model("Response candidate has no text".to_string()));
        }

        Ok(text.trim().to_string())
    }
}
