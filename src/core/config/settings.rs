use std::env;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use super::paths::AppPaths;

/// Typed application settings, loaded from `config.yml` with every field
/// defaulted so a missing or partial file still yields a runnable config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub provider: ProviderSettings,
    pub ingest: IngestSettings,
    pub query: QuerySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Base URL of the OpenAI-compatible language/embedding service.
    pub base_url: String,
    /// Optional bearer key; the `INSIGHTS_API_KEY` env var takes precedence.
    pub api_key: Option<String>,
    pub generation_model: String,
    pub embedding_model: String,
    /// Dimension of the embedding vectors (zero-vector fallback must match).
    pub embedding_dimension: usize,
    pub max_tokens: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// CSV of raw reviews, relative paths resolved against the project root.
    pub dataset_path: PathBuf,
    /// Rows read from the dataset beyond this cap are ignored.
    pub sample_size: usize,
    pub shuffle_seed: u64,
    /// Bound on concurrent judge+embed tasks during ingestion.
    pub concurrency: usize,
    pub collection: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    pub top_k: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: ProviderSettings::default(),
            ingest: IngestSettings::default(),
            query: QuerySettings::default(),
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1234".to_string(),
            api_key: None,
            generation_model: "text-express".to_string(),
            embedding_model: "embed-text".to_string(),
            embedding_dimension: 1536,
            max_tokens: 512,
        }
    }
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("amazon_reviews.csv"),
            sample_size: 45,
            shuffle_seed: 42,
            concurrency: 4,
            collection: "product_reviews".to_string(),
        }
    }
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

impl Settings {
    /// Load settings from `config.yml` (user data dir first, then project
    /// root), falling back to defaults on a missing or unparsable file.
    pub fn load(paths: &AppPaths) -> Self {
        let mut settings = config_path(paths)
            .and_then(|path| fs::read_to_string(&path).ok())
            .and_then(|contents| match serde_yaml::from_str::<Settings>(&contents) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    tracing::warn!("Ignoring unparsable config.yml: {}", err);
                    None
                }
            })
            .unwrap_or_default();

        settings.apply_overrides(|key| env::var(key).ok());

        if settings.ingest.dataset_path.is_relative() {
            settings.ingest.dataset_path = paths.project_root.join(&settings.ingest.dataset_path);
        }

        settings
    }

    fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(url) = get("INSIGHTS_PROVIDER_URL") {
            self.provider.base_url = url;
        }
        if let Some(key) = get("INSIGHTS_API_KEY") {
            self.provider.api_key = Some(key);
        }
        if let Some(path) = get("INSIGHTS_DATASET") {
            self.ingest.dataset_path = PathBuf::from(path);
        }
    }
}

fn config_path(paths: &AppPaths) -> Option<PathBuf> {
    let user_config = paths.user_data_dir.join("config.yml");
    if user_config.exists() {
        return Some(user_config);
    }

    let project_config = paths.project_root.join("config.yml");
    if project_config.exists() {
        return Some(project_config);
    }

    None
}
