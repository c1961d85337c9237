//! Atomic persistence of the weather document
//!
//! The fetcher writes to a temporary file in the destination directory and
//! renames it into place, so a reader never observes a partially written
//! document. An interrupted run drops the temporary file without renaming.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::SkycastError;
use crate::models::WeatherDocument;

/// Serialize the document as pretty JSON and atomically replace `path`
pub fn write_atomic(document: &WeatherDocument, path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create output directory {}", parent.display()))?;

    let json = serde_json::to_string_pretty(document)
        .with_context(|| "Failed to serialize weather document")?;

    let mut tmp = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;
    tmp.write_all(json.as_bytes())
        .and_then(|()| tmp.write_all(b"\n"))
        .and_then(|()| tmp.as_file().sync_all())
        .with_context(|| "Failed to write weather document")?;

    tmp.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    debug!(path = %path.display(), "weather document persisted");
    Ok(())
}

/// Read and parse the document at `path`.
///
/// Missing, unreadable and unparseable files all surface as
/// [`SkycastError::Document`] so the publisher can fall back to its
/// no-data page.
pub fn load(path: &Path) -> crate::Result<WeatherDocument> {
    let raw = fs::read_to_string(path).map_err(|err| {
        SkycastError::document(format!("cannot read {}: {err}", path.display()))
    })?;

    serde_json::from_str(&raw).map_err(|err| {
        SkycastError::document(format!("cannot parse {}: {err}", path.display()))
    })
}
