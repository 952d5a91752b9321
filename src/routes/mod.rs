pub mod collection;
pub mod common;

pub use collection::collection_routes;
pub use common::common_routes;

use crate::error::panic_response;
use crate::handlers::not_found;
use crate::state::AppState;
use axum::handler::Handler;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Full application router: collection routes, common routes, then static files
/// (when configured) and finally the discovery 404.
pub fn app(state: AppState) -> Router {
    let fallback = not_found.with_state(state.clone());
    let router = Router::new()
        .merge(collection_routes(state.clone()))
        .merge(common_routes(state.clone()));
    let router = match &state.static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir)
                .call_fallback_on_method_not_allowed(true)
                .not_found_service(fallback),
        ),
        None => router.fallback_service(fallback),
    };
    with_layers(router)
}

/// Panic recovery, request tracing and CORS.
pub fn with_layers(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
