//! Snapshot adapters: read resource-graph snapshots from disk and normalise them.
//!
//! This crate is allowed to do filesystem IO. It does not run `pulumi`; callers export the
//! preview or stack state to JSON first.

#![forbid(unsafe_code)]

mod discover;
mod normalize;

use anyhow::Context;
use camino::Utf8Path;
use infraguard_types::SCHEMA_REPORT_V1;
use rayon::prelude::*;
use serde_json::{Value, json};

pub use discover::discover_snapshots;
pub use normalize::{SnapshotFormat, name_from_urn, normalize};

/// Fuzz-friendly API for testing normalisation without filesystem access.
pub mod fuzz {
    /// Parse arbitrary text as a snapshot and normalise it. **Never panics** on any input.
    pub fn normalize_text(text: &str) -> anyhow::Result<usize> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Ok(super::normalize(&value).map_or(0, |r| r.len()))
    }
}

/// Load the snapshot at `path` as an engine-shaped JSON value (`{"resources": [...]}`).
///
/// A file in an unrecognised format is returned unchanged so the engine can report it as an
/// input fault. A directory loads every `*.json` below it; there every file must be recognised,
/// except infraguard's own reports, which are skipped so a report written under the graph
/// directory does not break the next run.
pub fn load_snapshot(path: &Utf8Path) -> anyhow::Result<Value> {
    if path.is_dir() {
        return load_dir(path);
    }

    let value = read_json(path)?;
    match normalize(&value) {
        Some(resources) => {
            tracing::debug!(path = %path, resources = resources.len(), "loaded snapshot");
            Ok(json!({ "resources": resources }))
        }
        None => {
            tracing::warn!(path = %path, "unrecognised snapshot format");
            Ok(value)
        }
    }
}

fn load_dir(dir: &Utf8Path) -> anyhow::Result<Value> {
    let files = discover_snapshots(dir);
    if files.is_empty() {
        anyhow::bail!("no *.json snapshots found under {dir}");
    }

    // Parse in parallel; collect() keeps path order.
    let parsed: Vec<Option<Vec<Value>>> = files
        .par_iter()
        .map(|file| {
            let value = read_json(file)?;
            if is_report(&value) {
                tracing::debug!(path = %file, "skipping infraguard report");
                return Ok(None);
            }
            normalize(&value)
                .map(Some)
                .with_context(|| format!("unrecognised snapshot format in {file}"))
        })
        .collect::<anyhow::Result<_>>()?;

    let loaded = parsed.iter().filter(|p| p.is_some()).count();
    if loaded == 0 {
        anyhow::bail!("no *.json snapshots found under {dir}");
    }

    let resources: Vec<Value> = parsed.into_iter().flatten().flatten().collect();
    tracing::debug!(dir = %dir, files = loaded, resources = resources.len(), "loaded snapshot directory");
    Ok(json!({ "resources": resources }))
}

fn is_report(value: &Value) -> bool {
    value.get("schema").and_then(Value::as_str) == Some(SCHEMA_REPORT_V1)
}

fn read_json(path: &Utf8Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parse {path}"))
}
