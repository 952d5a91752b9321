//! Collection routes. One parameterized route serves every collection; the set of
//! valid names lives in the store snapshot, so nothing is registered at reload time.
//! The static `/api/status` and `/api/reload` paths win over `/api/:collection`.
//! A wrong method on a known path gets the same discovery 404 as an unknown path.

use crate::handlers::{index, list, not_found, read_collection, read_record, reload, status};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn collection_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).fallback(not_found))
        .route("/api", get(list).fallback(not_found))
        .route("/api/status", get(status).fallback(not_found))
        .route("/api/reload", post(reload).fallback(not_found))
        .route("/api/:collection", get(read_collection).fallback(not_found))
        .route("/api/:collection/:id", get(read_record).fallback(not_found))
        .with_state(state)
}
