use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::config::{AppPaths, Settings};
use crate::index::{SqliteIndex, VectorIndex};
use crate::ingest::{ingest_records, load_hybrid_records, IngestReport, QuarantineLog};
use crate::llm::openai::OpenAiProvider;
use crate::llm::CapabilityClient;
use crate::rag::AnswerService;

/// Frozen output of one ingestion run plus the handles the query path
/// needs. Built exactly once per process, before the server accepts
/// requests; handlers cannot re-trigger ingestion.
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub settings: Settings,
    pub capability: Arc<CapabilityClient>,
    pub index: Arc<dyn VectorIndex>,
    pub quarantine: Arc<QuarantineLog>,
    pub report: IngestReport,
    pub answerer: AnswerService,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub async fn initialize(paths: Arc<AppPaths>) -> anyhow::Result<Arc<Self>> {
        let settings = Settings::load(&paths);

        // The one fatal startup condition: a misconfigured capability client.
        let provider = OpenAiProvider::new(&settings.provider)?;
        let capability = Arc::new(CapabilityClient::new(
            Arc::new(provider),
            settings.provider.embedding_dimension,
            settings.provider.max_tokens,
        ));

        let index: Arc<dyn VectorIndex> = Arc::new(SqliteIndex::new(&paths).await?);

        let records = load_hybrid_records(&settings.ingest).await;
        let (quarantine, report) = ingest_records(
            records,
            &capability,
            index.as_ref(),
            &settings.ingest.collection,
            settings.ingest.concurrency,
        )
        .await?;

        let answerer = AnswerService::new(
            capability.clone(),
            index.clone(),
            settings.ingest.collection.clone(),
            settings.query.top_k,
        );

        Ok(Arc::new(AppState {
            paths,
            settings,
            capability,
            index,
            quarantine: Arc::new(quarantine),
            report,
            answerer,
            started_at: Utc::now(),
        }))
    }
}
