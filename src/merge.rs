//! Merge a directory of JSON source files into one consolidated document.
//!
//! Files are processed in ascending file-name order. A file whose top-level value
//! is a non-empty object of arrays is a multi-collection file and contributes one
//! collection per key; any other file is stored under its file stem. Later files
//! overwrite earlier ones on key collisions.

use crate::error::{FileError, MergeError};
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Collection name → collection value, in insertion order.
pub type Document = Map<String, Value>;

#[derive(Clone, Debug, Default, Serialize)]
pub struct SkippedFile {
    pub file: String,
    pub reason: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct MergeReport {
    pub processed: Vec<String>,
    pub skipped: Vec<SkippedFile>,
    pub keys: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct MergeOutcome {
    pub document: Document,
    pub report: MergeReport,
}

#[derive(Clone, Debug)]
pub struct Merger {
    source_dir: PathBuf,
    snapshot_path: Option<PathBuf>,
}

impl Merger {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            snapshot_path: None,
        }
    }

    /// Also write every merged document to `path` (best effort).
    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Single pass over the source directory, one read attempt per file.
    /// A missing directory yields an empty document.
    pub async fn merge(&self) -> Result<MergeOutcome, MergeError> {
        let files = match self.list_source_files().await? {
            Some(files) => files,
            None => {
                tracing::info!(dir = %self.source_dir.display(), "source directory missing; empty document");
                return Ok(MergeOutcome::default());
            }
        };

        let mut document = Document::new();
        let mut report = MergeReport::default();
        for (name, path) in files {
            match read_source(&path).await {
                Ok(value) => {
                    let stem = file_stem(&name);
                    let added = merge_value(&mut document, stem, value);
                    tracing::debug!(file = %name, collections = added, "merged source file");
                    report.processed.push(name);
                }
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "skipping source file");
                    report.skipped.push(SkippedFile {
                        file: name,
                        reason: e.to_string(),
                    });
                }
            }
        }
        report.keys = document.keys().cloned().collect();
        tracing::info!(
            processed = report.processed.len(),
            skipped = report.skipped.len(),
            collections = report.keys.len(),
            "merge complete"
        );

        if let Some(snapshot) = &self.snapshot_path {
            if let Err(e) = write_snapshot(snapshot, &document).await {
                tracing::warn!(path = %snapshot.display(), error = %e, "failed to write snapshot");
            }
        }
        Ok(MergeOutcome { document, report })
    }

    /// Returns `None` when the directory does not exist.
    async fn list_source_files(&self) -> Result<Option<Vec<(String, PathBuf)>>, MergeError> {
        let io_err = |source: std::io::Error| MergeError::Io {
            path: self.source_dir.clone(),
            source,
        };
        let meta = match tokio::fs::metadata(&self.source_dir).await {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_err(e)),
        };
        if !meta.is_dir() {
            return Err(MergeError::NotADirectory(self.source_dir.clone()));
        }

        let dir = tokio::fs::canonicalize(&self.source_dir).await.map_err(io_err)?;
        let snapshot = self.canonical_snapshot().await;
        let mut entries = tokio::fs::read_dir(&dir).await.map_err(io_err)?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = dir.join(entry.file_name());
            if !is_json_file(&path) || snapshot.as_ref() == Some(&path) {
                continue;
            }
            match entry.file_type().await {
                Ok(ft) if ft.is_dir() => continue,
                _ => {}
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            files.push((name, path));
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Some(files))
    }

    /// Snapshot path with its parent directory resolved, so it compares equal to
    /// entries read from a canonical source directory. The file need not exist yet.
    async fn canonical_snapshot(&self) -> Option<PathBuf> {
        let snapshot = self.snapshot_path.as_ref()?;
        let name = snapshot.file_name()?;
        let parent = match snapshot.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        tokio::fs::canonicalize(parent).await.ok().map(|p| p.join(name))
    }
}

fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

async fn read_source(path: &Path) -> Result<Value, FileError> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// True when `value` is a non-empty object whose every value is an array.
pub fn is_multi_collection(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty() && map.values().all(Value::is_array),
        _ => false,
    }
}

/// Merge one parsed file into `document`. Returns how many collections it contributed.
pub fn merge_value(document: &mut Document, stem: &str, value: Value) -> usize {
    if is_multi_collection(&value) {
        let Value::Object(map) = value else {
            return 0;
        };
        let n = map.len();
        for (key, collection) in map {
            document.insert(key, collection);
        }
        n
    } else {
        document.insert(stem.to_string(), value);
        1
    }
}

async fn write_snapshot(path: &Path, document: &Document) -> Result<(), FileError> {
    let body = serde_json::to_vec_pretty(document)?;
    tokio::fs::write(path, body).await?;
    Ok(())
}
