//! Gemini `generateContent` REST client.

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::GenerateError;

use super::ModelClient;

/// Talks to a hosted Gemini model over HTTPS.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    api_base_url: String,
    model_name: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model_name: config.model_name.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base_url, self.model_name
        )
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
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
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl ModelClient for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, prompt: &str, schema: &Value) -> Result<String, GenerateError> {
        debug!(
            "Calling {} with a {} character prompt",
            self.model_name,
            prompt.len()
        );

        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema
            }
        });

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|source| GenerateError::Transport {
                model: self.model_name.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{} returned HTTP {}", self.model_name, status);
            return Err(GenerateError::Api {
                model: self.model_name.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateContentResponse =
            response
                .json()
                .await
                .map_err(|source| GenerateError::Transport {
                    model: self.model_name.clone(),
                    source,
                })?;

        let text = payload.into_text();
        if text.trim().is_empty() {
            return Err(GenerateError::EmptyResponse {
                model: self.model_name.clone(),
            });
        }

        debug!("{} answered with {} characters", self.model_name, text.len());
        Ok(text)
    }
}
