use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::LanguageProvider;
use super::types::GenerationRequest;
use crate::core::config::settings::ProviderSettings;
use crate::core::errors::ApiError;

/// Client for an OpenAI-compatible language/embedding service.
#[derive(Clone)]
pub struct OpenAiProvider {
    base_url: String,
    api_key: Option<String>,
    generation_model: String,
    embedding_model: String,
    client: Client,
}

impl OpenAiProvider {
    /// Fails when the base URL is empty; this is the one fatal
    /// misconfiguration that must abort process startup.
    pub fn new(settings: &ProviderSettings) -> Result<Self, ApiError> {
        let base_url = settings.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::Internal(
                "Provider base URL is not configured".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            api_key: settings.api_key.clone(),
            generation_model: settings.generation_model.clone(),
            embedding_model: settings.embedding_model.clone(),
            client: Client::new(),
        })
    }

    fn request(&self, url: &str, body: &Value) -> reqwest::RequestBuilder {
        let mut builder = self.client.post(url).json(body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }
}

#[async_trait]
impl LanguageProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn health_check(&self) -> Result<bool, ApiError> {
        let url = format!("{}/v1/models", self.base_url);
        let res = self.client.get(&url).send().await;
        match res {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, ApiError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut body = json!({
            "model": self.generation_model,
            "messages": request.messages,
            "temperature": request.temperature,
            "stream": false,
        });

        if let (Some(obj), Some(max_tokens)) = (body.as_object_mut(), request.max_tokens) {
            obj.insert("max_tokens".to_string(), json!(max_tokens));
        }

        let res = self
            .request(&url, &body)
            .send()
            .await
            .map_err(ApiError::internal)?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Internal(format!("Generation error: {}", text)));
        }

        let payload: Value = res.json().await.map_err(ApiError::internal)?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        Ok(content)
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
        let url = format!("{}/v1/embeddings", self.base_url);

        let body = json!({
            "model": self.embedding_model,
            "input": inputs,
        });

        let res = self
            .request(&url, &body)
            .send()
            .await
            .map_err(ApiError::internal)?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Internal(format!("Embedding error: {}", text)));
        }

        let payload: Value = res.json().await.map_err(ApiError::internal)?;

        let mut embeddings = Vec::new();
        if let Some(data) = payload["data"].as_array() {
            for item in data {
                if let Some(vals) = item["embedding"].as_array() {
                    let vec: Vec<f32> = vals
                        .iter()
                        .filter_map(|v| v.as_f64().map(|f| f as f32))
                        .collect();
                    embeddings.push(vec);
                }
            }
        }

        if embeddings.len() != inputs.len() {
            return Err(ApiError::Internal(format!(
                "Embedding count mismatch: expected {}, got {}",
                inputs.len(),
                embeddings.len()
            )));
        }

        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::settings::ProviderSettings;

    #[test]
    fn empty_base_url_is_fatal() {
        let settings = ProviderSettings {
            base_url: "   ".to_string(),
            ..ProviderSettings::default()
        };
        assert!(OpenAiProvider::new(&settings).is_err());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let settings = ProviderSettings {
            base_url: "http://localhost:1234/".to_string(),
            ..ProviderSettings::default()
        };
        let provider = OpenAiProvider::new(&settings).unwrap();
        assert_eq!(provider.base_url, "http://localhost:1234");
    }
}
