use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

pub async fn post_query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.answerer.answer(&request.query).await?;

    if outcome.matches.is_empty() {
        return Ok(Json(json!({
            "matches": [],
            "answer": null,
            "degraded": false,
            "message": "No relevant documents found."
        })));
    }

    Ok(Json(json!({
        "matches": outcome.matches,
        "answer": outcome.answer,
        "degraded": outcome.degraded
    })))
}
