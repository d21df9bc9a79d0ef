//! Config file naming: every generated service reads `etc/config.yaml`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScaffoldError};

pub const CONFIG_FILE: &str = "config.yaml";

/// Rename the service's generated `etc/*.yaml` to `etc/config.yaml`.
///
/// Leaves an existing `config.yaml` untouched. Picks the first yaml file in
/// name order otherwise. Returns the renamed file, if any.
pub fn rename_service_config(service_dir: &Path) -> Result<Option<PathBuf>> {
    let etc = service_dir.join("etc");
    let target = etc.join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = glob_sorted(&etc, "*.yaml")?
        .into_iter()
        .find(|p| p.file_name().map_or(false, |n| n != CONFIG_FILE));
    let Some(source) = source else {
        return Ok(None);
    };
    fs::rename(&source, &target).map_err(|e| ScaffoldError::io(&source, e))?;
    tracing::debug!(from = %source.display(), to = %target.display(), "config renamed");
    Ok(Some(source))
}

/// Files in `dir` matching `pattern`, sorted by path.
pub(crate) fn glob_sorted(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full = format!("{}/{pattern}", glob::Pattern::escape(&dir.to_string_lossy()));
    let mut paths: Vec<PathBuf> = glob::glob(&full)
        .map_err(|source| ScaffoldError::Pattern {
            pattern: full.clone(),
            source,
        })?
        .filter_map(|entry| entry.ok())
        .collect();
    paths.sort();
    Ok(paths)
}

/// Rename `etc/gateway.yaml` to `etc/config.yaml` when present.
pub fn rename_gateway_config(gateway_dir: &Path) -> Result<bool> {
    let source = gateway_dir.join("etc").join("gateway.yaml");
    if !source.exists() {
        return Ok(false);
    }
    let target = gateway_dir.join("etc").join(CONFIG_FILE);
    fs::rename(&source, &target).map_err(|e| ScaffoldError::io(&source, e))?;
    Ok(true)
}
