//! json-collections: serves a directory of merged JSON files as read-only REST collections.

pub mod config;
pub mod error;
pub mod handlers;
pub mod merge;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;

pub use config::ServerConfig;
pub use error::{AppError, ConfigError, FileError, MergeError};
pub use merge::{Document, MergeOutcome, MergeReport, Merger, SkippedFile};
pub use routes::{app, collection_routes, common_routes};
pub use state::AppState;
pub use store::{loose_eq, sanitize_name, CollectionStore, NotFound, Snapshot};
