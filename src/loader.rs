use crate::registry::FileDescriptor;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Position of the source descriptor in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Array,
    Object,
}

impl PayloadKind {
    pub fn of(data: &Value) -> Self {
        if data.is_array() {
            Self::Array
        } else {
            Self::Object
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Array => "Array",
            Self::Object => "Object",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub id: RecordId,
    pub name: String,
    pub description: Option<String>,
    pub icon: String,
    pub data: Value,
    pub size: usize,
    pub records: usize,
    pub url: String,
}

impl FileRecord {
    pub fn from_parts(id: RecordId, descriptor: &FileDescriptor, data: Value, url: String) -> Self {
        let size = canonical_size(&data);
        let records = count_records(&data);
        Self {
            id,
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            icon: descriptor.icon.clone(),
            data,
            size,
            records,
            url,
        }
    }

    pub fn kind(&self) -> PayloadKind {
        PayloadKind::of(&self.data)
    }
}

/// Array length, top-level key count for objects, zero for scalars.
pub fn count_records(data: &Value) -> usize {
    match data {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => 0,
    }
}

/// Byte length of the compact serialization. Integral floats keep their
/// fraction (`1.0` stays `1.0`).
pub fn canonical_size(data: &Value) -> usize {
    serde_json::to_string(data).map(|s| s.len()).unwrap_or(0)
}

/// Where registry entries are fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceOrigin {
    Http { base: String },
    Directory(PathBuf),
}

impl ResourceOrigin {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Http {
                base: trimmed.to_string(),
            }
        } else if trimmed.is_empty() {
            Self::Directory(PathBuf::from("."))
        } else {
            Self::Directory(PathBuf::from(trimmed))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Http { base } => format!("Source: {}", page_directory(base)),
            Self::Directory(dir) => format!("Source: {}", display_path(&absolute_path(dir))),
        }
    }

    /// Fully-qualified address shown and copied for `name`.
    pub fn resolve_url(&self, name: &str) -> String {
        match self {
            Self::Http { base } => format!("{}{}", page_directory(base), name),
            Self::Directory(dir) => file_url(&absolute_path(&dir.join(name))),
        }
    }

    fn fetch_bytes(&self, name: &str) -> Result<Vec<u8>> {
        match self {
            Self::Http { .. } => {
                let url = self.resolve_url(name);
                let response = ureq::get(&url)
                    .call()
                    .with_context(|| format!("GET {url} failed"))?;
                let mut body = Vec::new();
                response
                    .into_reader()
                    .read_to_end(&mut body)
                    .with_context(|| format!("failed to read body of {url}"))?;
                Ok(body)
            }
            Self::Directory(dir) => {
                let path = dir.join(name);
                fs::read(&path).with_context(|| format!("failed to read {}", path.display()))
            }
        }
    }

    pub fn fetch_json(&self, name: &str) -> Result<Value> {
        let bytes = self.fetch_bytes(name)?;
        // Sniffs and strips a BOM the way a browser decodes a JSON body.
        let (text, _, had_errors) = encoding_rs::UTF_8.decode(&bytes);
        if had_errors {
            debug!(file = name, "body contained invalid UTF-8 sequences");
        }
        serde_json::from_str(&text).with_context(|| format!("{name} is not well-formed JSON"))
    }
}

/// Base URL up to and including its last path separator.
fn page_directory(base: &str) -> String {
    let base = base.split(['?', '#']).next().unwrap_or(base);
    let path_start = base.find("://").map(|idx| idx + 3).unwrap_or(0);
    match base[path_start..].rfind('/') {
        Some(idx) => base[..path_start + idx + 1].to_string(),
        None => format!("{base}/"),
    }
}

fn absolute_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn display_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    #[cfg(windows)]
    {
        if let Some(rest) = raw.strip_prefix(r"\\?\UNC\") {
            return format!(r"\\{}", rest);
        }
        if let Some(rest) = raw.strip_prefix(r"\\?\") {
            return rest.to_string();
        }
    }
    raw.to_string()
}

fn file_url(path: &Path) -> String {
    let text = display_path(path).replace('\\', "/");
    if text.starts_with('/') {
        format!("file://{text}")
    } else {
        format!("file:///{text}")
    }
}

/// Result of one load: the new working set and its total record count.
#[derive(Debug, Clone, Default)]
pub struct LoadSnapshot {
    pub records: Vec<Arc<FileRecord>>,
    pub total_records: usize,
}

pub fn load(descriptors: &[FileDescriptor], origin: &ResourceOrigin) -> LoadSnapshot {
    let fetched: Vec<Option<Arc<FileRecord>>> = descriptors
        .par_iter()
        .enumerate()
        .map(|(idx, descriptor)| match origin.fetch_json(&descriptor.name) {
            Ok(data) => {
                let url = origin.resolve_url(&descriptor.name);
                Some(Arc::new(FileRecord::from_parts(
                    RecordId(idx),
                    descriptor,
                    data,
                    url,
                )))
            }
            Err(err) => {
                let error = format!("{err:#}");
                warn!(file = %descriptor.name, %error, "skipping JSON file");
                None
            }
        })
        .collect();

    let records: Vec<Arc<FileRecord>> = fetched.into_iter().flatten().collect();
    let total_records = records.iter().map(|r| r.records).sum();
    LoadSnapshot {
        records,
        total_records,
    }
}
