//! Core loading and binding logic for the modcheck probe harness.
//!
//! The pipeline per load attempt is Unopened -> Opened -> Bound -> Ready:
//!
//! - [`LibraryLoader`] opens a shared library by path and returns a
//!   [`LibraryHandle`] whose drop unloads it exactly once.
//! - [`ScriptModule::bind`] resolves the three required entry points
//!   (`GetScriptRevisionHash`, `AddScripts`, `GetScriptName`) in order and
//!   packages them with the handle; a missing symbol fails the whole bind
//!   and releases the handle immediately.
//! - [`probe`] composes the two, invokes the entry points once, and lets
//!   the module drop to unload.
//!
//! Everything here is synchronous and blocking; failures surface as
//! [`ProbeError`] values, never as panics crossing the load/bind boundary.

pub mod error;
pub mod loader;
pub mod module;
pub mod probe;

pub use error::{ProbeError, Result};
pub use loader::{
    platform_library_filename, shared_library_extension, shared_library_prefix, LibraryHandle,
    LibraryLoader,
};
pub use module::{ScriptModule, SymbolSource};
pub use probe::{probe, probe_cached, ProbeReport};
