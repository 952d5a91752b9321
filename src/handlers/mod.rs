//! HTTP handlers for collection reads, reload and status.

pub mod admin;
pub mod collection;
pub use admin::*;
pub use collection::*;
