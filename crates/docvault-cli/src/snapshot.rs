//! Forest snapshot files.
//!
//! A snapshot is the JSON array of archives the tree was last hydrated
//! from, in the same camelCase form the document API returns.

use std::path::Path;

use tracing::debug;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_entity::archive::Archive;

/// Read a snapshot.
pub async fn load(path: &Path) -> AppResult<Vec<Archive>> {
    let raw = tokio::fs::read(path).await.map_err(|e| {
        let kind = if e.kind() == std::io::ErrorKind::NotFound {
            ErrorKind::NotFound
        } else {
            ErrorKind::Storage
        };
        AppError::with_source(
            kind,
            format!("Failed to read snapshot {}: {e}", path.display()),
            e,
        )
    })?;
    let forest: Vec<Archive> = serde_json::from_slice(&raw)?;
    debug!(path = %path.display(), archives = forest.len(), "Snapshot loaded");
    Ok(forest)
}

/// Write a snapshot, replacing the file atomically.
pub async fn save(path: &Path, forest: &[Archive]) -> AppResult<()> {
    let json = serde_json::to_vec_pretty(forest)?;
    let staging = path.with_extension("json.tmp");
    tokio::fs::write(&staging, json).await?;
    tokio::fs::rename(&staging, path).await?;
    debug!(path = %path.display(), archives = forest.len(), "Snapshot saved");
    Ok(())
}
