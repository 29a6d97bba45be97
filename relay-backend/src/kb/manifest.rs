//! Rewrites the knowledge-base manifest's document list after a sync run.

use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

/// Outcome of a manifest refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The documents list was replaced and the manifest rewritten.
    Updated,
    /// No files were synced; the manifest was left untouched.
    NoOp,
}

/// Replace the manifest's `documents` list with the synced files, expressed
/// as `./`-prefixed paths relative to the manifest's directory. All other
/// fields round-trip unchanged.
///
/// An empty `local_paths` is a no-op, not an update: wiping a valid
/// manifest because sync produced nothing would poison the next import.
pub fn refresh_manifest(
    manifest_path: &Path,
    local_paths: &[PathBuf],
) -> Result<RefreshOutcome, String> {
    if local_paths.is_empty() {
        return Ok(RefreshOutcome::NoOp);
    }

    let raw = std::fs::read_to_string(manifest_path)
        .map_err(|e| format!("Failed to read {}: {}", manifest_path.display(), e))?;
    let mut manifest: Mapping = serde_yaml::from_str(&raw)
        .map_err(|e| format!("Invalid manifest {}: {}", manifest_path.display(), e))?;

    let base = manifest_path.parent().unwrap_or_else(|| Path::new(""));
    let documents: Vec<Value> = local_paths
        .iter()
        .map(|p| Value::String(manifest_relative(p, base)))
        .collect();
    manifest.insert(
        Value::String("documents".to_string()),
        Value::Sequence(documents),
    );

    let out = serde_yaml::to_string(&manifest)
        .map_err(|e| format!("Failed to serialize manifest: {}", e))?;
    std::fs::write(manifest_path, out)
        .map_err(|e| format!("Failed to write {}: {}", manifest_path.display(), e))?;

    Ok(RefreshOutcome::Updated)
}

/// Express a synced file as a `./` path relative to the manifest directory,
/// the form the import command resolves document entries in.
fn manifest_relative(path: &Path, base: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    format!("./{}", rel.display())
}
