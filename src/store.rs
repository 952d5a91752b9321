//! In-memory collection store: holds the current document snapshot, derives the
//! routable name set and answers collection/record lookups.
//!
//! Snapshots are immutable. `load` builds a new one off to the side and swaps the
//! pointer; readers clone the `Arc` and query it without further locking.

use crate::error::MergeError;
use crate::merge::{Document, MergeReport, Merger};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, LazyLock, RwLock};

static UNSAFE_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_-]").expect("static pattern"));

/// Strip every character outside `[A-Za-z0-9_-]`. `None` when nothing is left.
pub fn sanitize_name(raw: &str) -> Option<String> {
    let safe = UNSAFE_NAME_CHARS.replace_all(raw, "");
    if safe.is_empty() {
        None
    } else {
        Some(safe.into_owned())
    }
}

/// Loose id comparison between a record's `id` value and a path id.
/// Strings compare exactly; numbers and booleans compare numerically against the
/// trimmed id parsed as f64 (`"3"` matches `3`, `"1"` matches `true`). A blank id
/// counts as 0, so `" "` matches `0` and `false`.
pub fn loose_eq(value: &Value, id: &str) -> bool {
    match value {
        Value::String(s) => s == id,
        Value::Number(n) => match (n.as_f64(), parse_number(id)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        Value::Bool(b) => parse_number(id) == Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

fn parse_number(id: &str) -> Option<f64> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Immutable view of one loaded document.
#[derive(Debug)]
pub struct Snapshot {
    document: Document,
    /// Sanitized names in document order, first occurrence wins.
    names: Vec<String>,
    /// Sanitized name → raw document key.
    routes: HashMap<String, String>,
    loaded_at: DateTime<Utc>,
}

impl Snapshot {
    fn build(document: Document) -> Self {
        let mut names = Vec::new();
        let mut routes = HashMap::new();
        for key in document.keys() {
            if let Some(safe) = sanitize_name(key) {
                if !routes.contains_key(&safe) {
                    routes.insert(safe.clone(), key.clone());
                    names.push(safe);
                }
            }
        }
        Self {
            document,
            names,
            routes,
            loaded_at: Utc::now(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Exact raw-key lookup.
    pub fn get_collection(&self, name: &str) -> Option<&Value> {
        self.document.get(name)
    }

    /// Raw key first, then the sanitized route index.
    pub fn resolve(&self, name: &str) -> Option<&Value> {
        self.document.get(name).or_else(|| {
            self.routes
                .get(name)
                .and_then(|raw| self.document.get(raw.as_str()))
        })
    }

    /// First object element of an array collection whose `id` loosely equals `id`.
    pub fn find_record<'a>(collection: &'a Value, id: &str) -> Option<&'a Value> {
        collection.as_array()?.iter().find(|item| {
            item.as_object()
                .and_then(|obj| obj.get("id"))
                .map(|v| loose_eq(v, id))
                .unwrap_or(false)
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CollectionStatus {
    pub count: usize,
    #[serde(rename = "type")]
    pub type_: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReloadSummary {
    pub collections: Vec<String>,
    pub report: MergeReport,
}

/// Requested collection or record is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFound;

/// Owns the current snapshot. Share it behind an `Arc`.
pub struct CollectionStore {
    current: RwLock<Arc<Snapshot>>,
    reload_lock: tokio::sync::Mutex<()>,
}

impl Default for CollectionStore {
    fn default() -> Self {
        Self::new(Document::new())
    }
}

impl CollectionStore {
    pub fn new(document: Document) -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot::build(document))),
            reload_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Current snapshot. Every query made through it sees one consistent document.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the current document.
    pub fn load(&self, document: Document) {
        let next = Arc::new(Snapshot::build(document));
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = next;
    }

    pub fn list_collections(&self) -> Vec<String> {
        self.snapshot().names().to_vec()
    }

    pub fn get_collection(&self, name: &str) -> Result<Value, NotFound> {
        self.snapshot().get_collection(name).cloned().ok_or(NotFound)
    }

    pub fn get_record(&self, collection: &str, id: &str) -> Result<Value, NotFound> {
        let snapshot = self.snapshot();
        let value = snapshot.get_collection(collection).ok_or(NotFound)?;
        Snapshot::find_record(value, id).cloned().ok_or(NotFound)
    }

    /// Per-collection count and type, keyed by sanitized name.
    pub fn status(&self) -> BTreeMap<String, CollectionStatus> {
        let snapshot = self.snapshot();
        snapshot
            .names()
            .iter()
            .filter_map(|name| {
                snapshot.resolve(name).map(|value| {
                    (
                        name.clone(),
                        CollectionStatus {
                            count: crate::response::value_count(value),
                            type_: crate::response::value_type(value),
                        },
                    )
                })
            })
            .collect()
    }

    /// Re-merge and load. Concurrent reloads queue behind each other; on error the
    /// current snapshot is left untouched.
    pub async fn reload(&self, merger: &Merger) -> Result<ReloadSummary, MergeError> {
        let _guard = self.reload_lock.lock().await;
        tracing::info!(dir = %merger.source_dir().display(), "reloading collections");
        let outcome = merger.merge().await?;
        self.load(outcome.document);
        Ok(ReloadSummary {
            collections: self.list_collections(),
            report: outcome.report,
        })
    }
}
