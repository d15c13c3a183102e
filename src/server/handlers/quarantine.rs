use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

/// Full audit view of the records blocked during the ingestion run, with
/// their reasons. Nothing the gate blocks is hidden.
pub async fn get_quarantine(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "total_blocked": state.quarantine.len(),
        "entries": state.quarantine.entries()
    }))
}
