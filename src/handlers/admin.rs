//! Reload, status and discovery fallback handlers.

use crate::response::{endpoint_paths, error_body};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
struct StatusBody {
    status: &'static str,
    collections: BTreeMap<String, crate::store::CollectionStatus>,
    #[serde(rename = "lastReload")]
    last_reload: String,
}

/// POST /api/reload — re-merge the source directory and swap the document.
pub async fn reload(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.reload(&state.merger).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "message": "Database reloaded successfully",
                "collections": summary.collections,
                "processed": summary.report.processed,
                "skipped": summary.report.skipped,
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "reload failed; keeping previous collections");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "message": "Failed to reload database",
                })),
            )
        }
    }
}

/// GET /api/status — count and type per collection.
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    Json(StatusBody {
        status: "running",
        collections: state.store.status(),
        last_reload: state.store.snapshot().loaded_at().to_rfc3339(),
    })
}

/// Unmatched paths: 404 echoing the servable endpoints.
pub async fn not_found(State(state): State<AppState>, method: Method, uri: Uri) -> impl IntoResponse {
    let endpoints = endpoint_paths(&state.store.list_collections());
    (
        StatusCode::NOT_FOUND,
        Json(error_body(
            "not_found",
            format!("Path '{}' not found", uri),
            Some(serde_json::json!({
                "availableEndpoints": endpoints,
                "method": method.as_str(),
            })),
        )),
    )
}
