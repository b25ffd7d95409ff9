//! Symbol binding and the loaded script module.

use std::ffi::CStr;
use std::mem;
use std::os::raw::c_char;
use std::path::{Path, PathBuf};

use modcheck_sdk::{
    AddScriptsFn, GetScriptNameFn, GetScriptRevisionHashFn, SYM_ADD_SCRIPTS,
    SYM_GET_SCRIPT_NAME, SYM_GET_SCRIPT_REVISION_HASH,
};

use crate::error::{ProbeError, Result};
use crate::loader::LibraryHandle;

/// Source of named native entry points.
///
/// Implemented by [`LibraryHandle`] for real shared libraries and by
/// recording fakes in tests. Dropping a source releases whatever backs it.
pub trait SymbolSource {
    /// Resolve `name` to a raw entry-point address, or `None` when the
    /// symbol is not exported.
    fn resolve(&self, name: &'static str) -> Option<*const ()>;
}

/// Resolve a named entry point as a typed function pointer.
///
/// # Safety
/// `T` must be a function-pointer type matching the exact C signature of
/// the exported symbol.
unsafe fn entry_point<S, T>(source: &S, name: &'static str, path: &Path) -> Result<T>
where
    S: SymbolSource,
    T: Copy,
{
    debug_assert_eq!(mem::size_of::<T>(), mem::size_of::<*const ()>());

    let address = source.resolve(name).ok_or_else(|| ProbeError::SymbolMissing {
        symbol: name,
        path: path.to_path_buf(),
    })?;

    // SAFETY: caller guarantees T is the fn-pointer type of this export.
    Ok(unsafe { mem::transmute_copy::<*const (), T>(&address) })
}

/// A fully bound script module.
///
/// Holds the open handle plus the three resolved entry points; immutable
/// after construction. It is never built from a partially resolved symbol
/// set. Dropping the module drops the handle, which unloads the library.
#[derive(Debug)]
pub struct ScriptModule<S = LibraryHandle> {
    _handle: S,
    get_revision_hash: GetScriptRevisionHashFn,
    add_scripts: AddScriptsFn,
    get_name: GetScriptNameFn,
    path: PathBuf,
}

impl<S: SymbolSource> ScriptModule<S> {
    /// Resolve the three required entry points from `handle`.
    ///
    /// Resolution is ordered: revision hash, then `AddScripts`, then name,
    /// stopping at the first missing symbol. On failure the handle is
    /// dropped before this returns, so the library never stays mapped.
    pub fn bind(handle: S, path: &Path) -> Result<Self> {
        let get_revision_hash = unsafe {
            entry_point::<S, GetScriptRevisionHashFn>(&handle, SYM_GET_SCRIPT_REVISION_HASH, path)?
        };
        let add_scripts =
            unsafe { entry_point::<S, AddScriptsFn>(&handle, SYM_ADD_SCRIPTS, path)? };
        let get_name =
            unsafe { entry_point::<S, GetScriptNameFn>(&handle, SYM_GET_SCRIPT_NAME, path)? };

        Ok(Self {
            _handle: handle,
            get_revision_hash,
            add_scripts,
            get_name,
            path: path.to_path_buf(),
        })
    }

    /// The module's build revision hash. Empty when the module returned a
    /// null pointer.
    pub fn revision_hash(&self) -> String {
        owned_c_string(unsafe { (self.get_revision_hash)() })
    }

    /// The module's display name. Empty when the module returned a null
    /// pointer.
    pub fn name(&self) -> String {
        owned_c_string(unsafe { (self.get_name)() })
    }

    /// Invoke the module's registration entry point. Side effects are
    /// module-defined and opaque to the harness.
    pub fn add_scripts(&self) {
        unsafe { (self.add_scripts)() }
    }

    /// Path the module was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn owned_c_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    // SAFETY: the module contract requires a NUL-terminated string that
    // stays valid for the module's lifetime.
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}
