//! Error taxonomy for the load/bind/unload pipeline.

use std::path::PathBuf;

/// Result type for probe operations.
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Errors produced while loading, binding, or releasing a script module.
///
/// `OpenFailed` and `SymbolMissing` abort the current load attempt and are
/// surfaced to the caller. `UnloadFailed` and `CacheDeleteFailed` occur
/// during teardown where no recovery is possible; they are logged by the
/// handle's drop path and never propagated.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The supplied module path was empty.
    #[error("empty module path")]
    EmptyPath,

    /// The module file does not exist on disk.
    #[error("module file not found: {}", path.display())]
    NotFound {
        /// Path that was checked.
        path: PathBuf,
    },

    /// The native loader could not map the library.
    #[error("could not load the shared library {}{}", path.display(), cache_note(cache_path))]
    OpenFailed {
        /// Path the failure is attributed to.
        path: PathBuf,
        /// Cached copy that was actually opened, when one was used.
        cache_path: Option<PathBuf>,
        /// Underlying loader error.
        #[source]
        source: libloading::Error,
    },

    /// A required entry point was not exported by the library.
    #[error("could not extract '{symbol}' function from library: {}", path.display())]
    SymbolMissing {
        /// Name of the first missing symbol in resolution order.
        symbol: &'static str,
        /// Path the library was loaded from.
        path: PathBuf,
    },

    /// The native unload call reported failure. Logged, never returned.
    #[error("failed to unload the shared library {}", path.display())]
    UnloadFailed {
        /// Path the library was loaded from.
        path: PathBuf,
        /// Underlying loader error.
        #[source]
        source: libloading::Error,
    },

    /// Deleting a cached copy of the library failed. Logged, never returned.
    #[error("failed to delete the cached shared library {}", cache_path.display())]
    CacheDeleteFailed {
        /// Cached copy that could not be removed.
        cache_path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
}

fn cache_note(cache_path: &Option<PathBuf>) -> String {
    match cache_path {
        Some(cache) => format!(" (cached at {})", cache.display()),
        None => String::new(),
    }
}
