//! Collection read handlers: listing, whole collection, single record.

use crate::error::AppError;
use crate::response::{endpoint_paths, enveloped};
use crate::state::AppState;
use crate::store::Snapshot;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct CollectionQuery {
    /// Wrap the value in `{success, endpoint, data, count}`. Kept as a string so an
    /// odd value never turns into a query rejection.
    pub envelope: Option<String>,
}

impl CollectionQuery {
    /// `true`, `1`, `yes` or a bare `?envelope` enable the envelope.
    pub fn wants_envelope(&self) -> bool {
        match self.envelope.as_deref().map(str::trim) {
            Some(v) => {
                v.is_empty()
                    || v == "1"
                    || v.eq_ignore_ascii_case("true")
                    || v.eq_ignore_ascii_case("yes")
            }
            None => false,
        }
    }
}

/// GET / — service banner with the advertised endpoints.
pub async fn index(State(state): State<AppState>) -> Json<serde_json::Value> {
    let endpoints = endpoint_paths(&state.store.list_collections());
    Json(serde_json::json!({
        "message": "Backend API is running!",
        "status": "OK",
        "totalEndpoints": endpoints.len(),
        "availableEndpoints": endpoints,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// GET /api — servable collection names and their paths.
pub async fn list(State(state): State<AppState>) -> Json<serde_json::Value> {
    let names = state.store.list_collections();
    Json(serde_json::json!({
        "message": "API endpoints available",
        "endpoints": endpoint_paths(&names),
        "data": names,
    }))
}

/// GET /api/:collection
pub async fn read_collection(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(query): Query<CollectionQuery>,
) -> Result<axum::response::Response, AppError> {
    let snapshot = state.store.snapshot();
    let value = snapshot
        .resolve(&collection)
        .cloned()
        .ok_or_else(|| unknown_collection(&snapshot, &collection))?;
    if query.wants_envelope() {
        Ok(enveloped(&collection, value).into_response())
    } else {
        Ok((StatusCode::OK, Json(value)).into_response())
    }
}

/// GET /api/:collection/:id
pub async fn read_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.store.snapshot();
    let value = snapshot
        .resolve(&collection)
        .ok_or_else(|| unknown_collection(&snapshot, &collection))?;
    let record = Snapshot::find_record(value, &id).cloned().ok_or_else(|| {
        AppError::NotFound(format!(
            "Item with id '{}' not found in collection '{}'",
            id, collection
        ))
    })?;
    Ok((StatusCode::OK, Json(record)))
}

fn unknown_collection(snapshot: &Snapshot, name: &str) -> AppError {
    AppError::UnknownCollection {
        name: name.to_string(),
        available: endpoint_paths(snapshot.names()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(envelope: Option<&str>) -> CollectionQuery {
        CollectionQuery {
            envelope: envelope.map(str::to_string),
        }
    }

    #[test]
    fn test_wants_envelope() {
        assert!(query(Some("true")).wants_envelope());
        assert!(query(Some("1")).wants_envelope());
        assert!(query(Some("YES")).wants_envelope());
        assert!(query(Some("")).wants_envelope());
        assert!(!query(Some("false")).wants_envelope());
        assert!(!query(Some("0")).wants_envelope());
        assert!(!query(None).wants_envelope());
    }
}
