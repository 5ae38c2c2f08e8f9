use crate::config::toml_config::CollaboratorConfig;
use crate::domain::ports::TextGenerator;
use crate::utils::error::{RaffleError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
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

impl GenerateResponse {
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        Some(text)
    }
}

/// Live client for a `generateContent` style REST endpoint.
pub struct GeminiGenerator {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiGenerator {
    pub fn new(config: &CollaboratorConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint().trim_end_matches('/').to_string(),
            model: config.model().to_string(),
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model)
    }

    async fn generate(&self, prompt: String, generation_config: Option<serde_json::Value>) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config,
        };

        tracing::debug!("Making text generation request to: {}", self.url());
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Text generation response status: {}", status);
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RaffleError::CollaboratorError {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed.text().ok_or_else(|| RaffleError::MalformedResponse {
            message: "response carried no candidates".to_string(),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate_congratulation(&self, name: &str, style_hint: &str) -> Result<String> {
        let prompt = format!(
            "Generate a short congratulatory message for {} who just won a prize at a company raffle. \
             The tone/vibe should be: {}. \
             Max 15 words. Respond in the same language as the vibe provided if it's Chinese, otherwise English.",
            name, style_hint
        );
        let text = self.generate(prompt, None).await?;
        Ok(text.trim().to_string())
    }

    async fn generate_team_names(&self, count: usize, theme: &str) -> Result<Vec<String>> {
        let prompt = format!(
            "Generate {} creative and funny team names for a company event. The theme is: {}. \
             Return as a JSON list of strings.",
            count, theme
        );
        let generation_config = json!({
            "responseMimeType": "application/json",
            "responseSchema": { "type": "ARRAY", "items": { "type": "STRING" } }
        });
        let text = self.generate(prompt, Some(generation_config)).await?;
        serde_json::from_str::<Vec<String>>(text.trim()).map_err(|e| RaffleError::MalformedResponse {
            message: format!("team names were not a JSON string list: {}", e),
        })
    }
}

/// Stand-in used when no credential is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGenerator;

#[async_trait]
impl TextGenerator for OfflineGenerator {
    async fn generate_congratulation(&self, _name: &str, _style_hint: &str) -> Result<String> {
        Err(RaffleError::CollaboratorUnavailable)
    }

    async fn generate_team_names(&self, _count: usize, _theme: &str) -> Result<Vec<String>> {
        Err(RaffleError::CollaboratorUnavailable)
    }
}

/// Live client when an API key is present, otherwise the offline stand-in.
pub fn build_text_generator(config: &CollaboratorConfig) -> Result<Arc<dyn TextGenerator>> {
    match config.api_key() {
        Some(key) => {
            tracing::info!("🤖 Text generation enabled (model: {})", config.model());
            Ok(Arc::new(GeminiGenerator::new(config, key.to_string())?))
        }
        None => {
            tracing::info!("Text generation not configured, using local templates");
            Ok(Arc::new(OfflineGenerator))
        }
    }
}
