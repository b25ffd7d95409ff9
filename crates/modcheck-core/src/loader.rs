//! Shared-library opening and scoped unload.
//!
//! [`LibraryLoader`] turns a filesystem path into an open [`LibraryHandle`].
//! The handle owns the mapping: dropping it unloads the library exactly
//! once, on every exit path, and deletes the cached copy afterwards when
//! one was used for the open.

use std::fs;
use std::path::{Path, PathBuf};

use libloading::Library;

use crate::error::{ProbeError, Result};
use crate::module::SymbolSource;

/// Returns the platform's shared-library filename prefix: `""` on Windows,
/// `"lib"` elsewhere.
pub fn shared_library_prefix() -> &'static str {
    if cfg!(windows) {
        ""
    } else {
        "lib"
    }
}

/// Returns the platform's shared-library filename extension: `"dll"` on
/// Windows, `"dylib"` on macOS, `"so"` elsewhere.
pub fn shared_library_extension() -> &'static str {
    if cfg!(windows) {
        "dll"
    } else if cfg!(target_os = "macos") {
        "dylib"
    } else {
        "so"
    }
}

/// Builds the on-disk filename for a logical module name, e.g.
/// `script_arm` -> `libscript_arm.so` on Linux.
///
/// Advisory helper: the harness itself always receives a fully qualified
/// path and never searches for the file.
pub fn platform_library_filename(stem: &str) -> String {
    format!(
        "{}{}.{}",
        shared_library_prefix(),
        stem,
        shared_library_extension()
    )
}

/// Opens shared libraries and hands out scoped handles.
///
/// Stateless; passed explicitly to whatever performs a probe rather than
/// held in process-global state.
#[derive(Debug, Default)]
pub struct LibraryLoader;

impl LibraryLoader {
    /// Create a new loader.
    pub fn new() -> Self {
        Self
    }

    /// Open the library at `path`.
    ///
    /// The caller is responsible for checking that the file exists; this
    /// call goes straight to the native loader with lazy symbol binding.
    pub fn open(&self, path: &Path) -> Result<LibraryHandle> {
        self.open_inner(path.to_path_buf(), None)
    }

    /// Open the cached copy at `cache_path`, attributing diagnostics to the
    /// original `path`. The cached copy is deleted after unload.
    pub fn open_cached(&self, path: &Path, cache_path: &Path) -> Result<LibraryHandle> {
        self.open_inner(path.to_path_buf(), Some(cache_path.to_path_buf()))
    }

    fn open_inner(&self, path: PathBuf, cache_path: Option<PathBuf>) -> Result<LibraryHandle> {
        let load_path = cache_path.as_deref().unwrap_or(&path);

        let library = unsafe { Library::new(load_path) }.map_err(|source| {
            ProbeError::OpenFailed {
                path: path.clone(),
                cache_path: cache_path.clone(),
                source,
            }
        })?;

        tracing::debug!(path = %path.display(), "opened shared library");

        Ok(LibraryHandle {
            library: Some(library),
            path,
            cache_path,
        })
    }
}

/// An open shared library together with its unload obligations.
///
/// Exclusively owns the native mapping. Dropping the handle unloads the
/// library exactly once; when the open went through a cached copy, the
/// copy is deleted after a successful unload. Both failure modes are
/// logged and swallowed since no recovery action exists at that point.
#[derive(Debug)]
pub struct LibraryHandle {
    // Some until Drop takes it.
    library: Option<Library>,
    path: PathBuf,
    cache_path: Option<PathBuf>,
}

impl LibraryHandle {
    /// Path the library is attributed to in diagnostics.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SymbolSource for LibraryHandle {
    fn resolve(&self, name: &'static str) -> Option<*const ()> {
        let library = self.library.as_ref()?;
        // libloading appends the trailing NUL on a non-terminated slice.
        let symbol = unsafe { library.get::<*const ()>(name.as_bytes()).ok()? };
        let address = *symbol;
        if address.is_null() {
            return None;
        }
        Some(address)
    }
}

impl Drop for LibraryHandle {
    fn drop(&mut self) {
        let Some(library) = self.library.take() else {
            return;
        };

        if let Err(source) = library.close() {
            let err = ProbeError::UnloadFailed {
                path: self.path.clone(),
                source,
            };
            tracing::error!(error = %err, "unload failed");
            return;
        }

        match self.cache_path.take() {
            Some(cache_path) => remove_cached_copy(&self.path, &cache_path),
            None => {
                tracing::trace!(path = %self.path.display(), "unloaded shared library");
            }
        }
    }
}

/// Deletes the cached copy of an unloaded library. Failure is logged and
/// otherwise ignored.
fn remove_cached_copy(path: &Path, cache_path: &Path) {
    match fs::remove_file(cache_path) {
        Ok(()) => {
            tracing::debug!(
                path = %path.display(),
                cache = %cache_path.display(),
                "unloaded shared library and deleted its cached copy"
            );
        }
        Err(source) => {
            let err = ProbeError::CacheDeleteFailed {
                cache_path: cache_path.to_path_buf(),
                source,
            };
            tracing::error!(error = %err, "cache cleanup failed");
        }
    }
}
