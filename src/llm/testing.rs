//! Scripted provider for tests: deterministic verdicts, lookup embeddings,
//! switchable failures, prompt capture.

use std::sync::Mutex;

use async_trait::async_trait;

use super::provider::LanguageProvider;
use super::types::GenerationRequest;
use crate::core::errors::ApiError;

pub struct ScriptedProvider {
    dimension: usize,
    /// Substring-keyed embedding overrides; first match wins.
    embeddings: Vec<(String, Vec<f32>)>,
    fail_embed_matching: Option<String>,
    fail_all_embeds: bool,
    fail_generation: bool,
    generation_answer: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            embeddings: Vec::new(),
            fail_embed_matching: None,
            fail_all_embeds: false,
            fail_generation: false,
            generation_answer: "Scripted grounded answer.".to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Pin the embedding returned for any input containing `needle`.
    pub fn with_embedding(mut self, needle: &str, vector: Vec<f32>) -> Self {
        self.embeddings.push((needle.to_string(), vector));
        self
    }

    /// Fail embedding for inputs containing `needle`.
    pub fn failing_embed_matching(mut self, needle: &str) -> Self {
        self.fail_embed_matching = Some(needle.to_string());
        self
    }

    pub fn failing_embeds(mut self) -> Self {
        self.fail_all_embeds = true;
        self
    }

    pub fn failing_generation(mut self) -> Self {
        self.fail_generation = true;
        self
    }

    pub fn with_answer(mut self, answer: &str) -> Self {
        self.generation_answer = answer.to_string();
        self
    }

    /// Prompts passed to `generate`, in call order.
    pub fn captured_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Prompts that were NOT judge prompts, i.e. grounded answer requests.
    pub fn answer_prompts(&self) -> Vec<String> {
        self.captured_prompts()
            .into_iter()
            .filter(|p| !p.contains("data quality reviewer"))
            .collect()
    }

    fn vector_for(&self, input: &str) -> Vec<f32> {
        for (needle, vector) in &self.embeddings {
            if input.contains(needle.as_str()) {
                return vector.clone();
            }
        }

        // Deterministic fallback: one-hot on the input length.
        let mut vector = vec![0.0; self.dimension];
        vector[input.len() % self.dimension] = 1.0;
        vector
    }

    fn verdict_for(prompt: &str) -> String {
        let review = prompt
            .split("Review: \"")
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .unwrap_or_default();
        let rating: i64 = prompt
            .split("Rating: ")
            .nth(1)
            .and_then(|rest| rest.split_whitespace().next())
            .and_then(|token| token.parse().ok())
            .unwrap_or(0);

        if review.contains("555-0199") || review.contains("@") {
            return r#"{"is_valid": false, "reason": "PII Detected"}"#.to_string();
        }
        let negative = review.contains("garbage")
            || review.contains("Terrible")
            || review.contains("do not buy");
        if negative && rating >= 4 {
            return r#"{"is_valid": false, "reason": "Sentiment Mismatch"}"#.to_string();
        }
        if review.contains("asdf") {
            return r#"{"is_valid": false, "reason": "Gibberish"}"#.to_string();
        }
        if review.contains("NO-JSON") {
            return "The model rambles and returns no structure here.".to_string();
        }

        r#"Here you go: {"is_valid": true, "reason": "Clean"}"#.to_string()
    }
}

#[async_trait]
impl LanguageProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn health_check(&self) -> Result<bool, ApiError> {
        Ok(true)
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, ApiError> {
        let prompt = request
            .messages
            .first()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.prompts.lock().unwrap().push(prompt.clone());

        if self.fail_generation {
            return Err(ApiError::Internal("scripted generation outage".to_string()));
        }

        if prompt.contains("data quality reviewer") {
            return Ok(Self::verdict_for(&prompt));
        }

        Ok(self.generation_answer.clone())
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
        if self.fail_all_embeds {
            return Err(ApiError::Internal("scripted embedding outage".to_string()));
        }
        if let Some(needle) = &self.fail_embed_matching {
            if inputs.iter().any(|input| input.contains(needle.as_str())) {
                return Err(ApiError::Internal("scripted embedding outage".to_string()));
            }
        }

        Ok(inputs.iter().map(|input| self.vector_for(input)).collect())
    }
}
