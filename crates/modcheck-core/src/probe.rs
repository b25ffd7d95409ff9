//! End-to-end probe: open, bind, invoke, unload.

use std::path::{Path, PathBuf};

use crate::error::{ProbeError, Result};
use crate::loader::LibraryLoader;
use crate::module::ScriptModule;

/// Identity reported by a successfully probed module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Module display name.
    pub name: String,
    /// Module build revision hash. Informational only; never validated
    /// against an expected value here.
    pub revision_hash: String,
    /// Path the module was loaded from.
    pub path: PathBuf,
}

/// Load the script module at `path`, invoke its entry points once, and
/// unload it on the way out.
///
/// Empty and nonexistent paths are rejected before any native loader call.
pub fn probe(loader: &LibraryLoader, path: &Path) -> Result<ProbeReport> {
    probe_inner(loader, path, None)
}

/// Like [`probe`], but opens the cached copy at `cache_path` and deletes it
/// after unload. Diagnostics stay attributed to `path`.
pub fn probe_cached(loader: &LibraryLoader, path: &Path, cache_path: &Path) -> Result<ProbeReport> {
    probe_inner(loader, path, Some(cache_path))
}

fn probe_inner(loader: &LibraryLoader, path: &Path, cache_path: Option<&Path>) -> Result<ProbeReport> {
    if path.as_os_str().is_empty() {
        return Err(ProbeError::EmptyPath);
    }

    let load_path = cache_path.unwrap_or(path);
    if !load_path.exists() {
        return Err(ProbeError::NotFound {
            path: load_path.to_path_buf(),
        });
    }

    let handle = match cache_path {
        Some(cache) => loader.open_cached(path, cache)?,
        None => loader.open(path)?,
    };
    let module = ScriptModule::bind(handle, path)?;

    let report = ProbeReport {
        name: module.name(),
        revision_hash: module.revision_hash(),
        path: path.to_path_buf(),
    };

    tracing::info!(path = %report.path.display(), "script module loaded");
    tracing::info!(name = %report.name, hash = %report.revision_hash, "script module identity");

    module.add_scripts();
    tracing::debug!(path = %report.path.display(), "AddScripts invoked");

    Ok(report)
    // `module` drops here, unloading the library.
}
