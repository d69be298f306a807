//! Catalog files on disk.
//!
//! # Atomic Writes
//!
//! Writes go to a hidden temp file next to the target and are renamed over
//! it only after the bytes are flushed, so a failed build step never leaves a
//! half-written catalog where the last good one was. The temp file is removed
//! on every failure path.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::codec::{deserialize, serialize};
use crate::error::{CatalogError, Result};
use crate::model::Catalog;

/// Read and decode a catalog file.
pub fn read_catalog(path: impl AsRef<Path>) -> Result<Catalog> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| CatalogError::io(path, e))?;
    let catalog = deserialize(&bytes)?;
    tracing::debug!(
        target: "tscat.persist",
        path = %path.display(),
        messages = catalog.len(),
        "catalog read"
    );
    Ok(catalog)
}

/// Encode and atomically replace a catalog file.
///
/// The parent directory must already exist.
pub fn write_catalog(path: impl AsRef<Path>, catalog: &Catalog) -> Result<()> {
    let path = path.as_ref();
    let bytes = serialize(catalog);
    let temp = temp_path(path);

    if let Err(error) = write_synced(&temp, &bytes) {
        let _ = fs::remove_file(&temp);
        return Err(CatalogError::io(&temp, error));
    }
    if let Err(error) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(CatalogError::io(path, error));
    }

    tracing::info!(
        target: "tscat.persist",
        path = %path.display(),
        bytes = bytes.len(),
        messages = catalog.len(),
        "catalog written"
    );
    Ok(())
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "catalog".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}
