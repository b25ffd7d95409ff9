//! Modcheck script-module SDK.
//!
//! This crate pins the naming contract between the probe harness and a
//! loadable script module: the exact exported symbol names and their C
//! signatures. A script module crate depends only on this crate, never on
//! the harness itself.
//!
//! # Quick Start
//!
//! ```rust
//! use modcheck_sdk::export_script_module;
//!
//! fn register_scripts() {
//!     // register behavior with the host
//! }
//!
//! export_script_module! {
//!     revision_hash: "deadbeef",
//!     name: "MyModule",
//!     add_scripts: register_scripts,
//! }
//! ```

use std::os::raw::c_char;

/// Name of the export returning the module's build revision hash.
pub const SYM_GET_SCRIPT_REVISION_HASH: &str = "GetScriptRevisionHash";

/// Name of the export that registers the module's scripts with the host.
pub const SYM_ADD_SCRIPTS: &str = "AddScripts";

/// Name of the export returning the module's display name.
pub const SYM_GET_SCRIPT_NAME: &str = "GetScriptName";

/// The required exports, in the order the harness resolves them.
pub const REQUIRED_SYMBOLS: [&str; 3] = [
    SYM_GET_SCRIPT_REVISION_HASH,
    SYM_ADD_SCRIPTS,
    SYM_GET_SCRIPT_NAME,
];

/// Signature of `GetScriptRevisionHash`.
///
/// Returns a NUL-terminated string identifying the build the module was
/// compiled from. The pointer must stay valid for the module's lifetime.
pub type GetScriptRevisionHashFn = unsafe extern "C" fn() -> *const c_char;

/// Signature of `AddScripts`.
///
/// Invoked once after a successful bind; performs the module's registration
/// side effects.
pub type AddScriptsFn = unsafe extern "C" fn();

/// Signature of `GetScriptName`.
///
/// Returns a NUL-terminated string naming the module. The pointer must stay
/// valid for the module's lifetime.
pub type GetScriptNameFn = unsafe extern "C" fn() -> *const c_char;

/// Generates the three exports every script module must provide.
///
/// `revision_hash` and `name` accept any expression convertible to a byte
/// string; the generated entry points hand out pointers into lazily built,
/// process-lifetime C strings. `add_scripts` is a path to a plain Rust
/// function invoked by the exported `AddScripts`.
///
/// An interior NUL in `revision_hash` or `name` degrades the returned
/// string to empty rather than aborting the host.
#[macro_export]
macro_rules! export_script_module {
    (
        revision_hash: $hash:expr,
        name: $name:expr,
        add_scripts: $add:path $(,)?
    ) => {
        /// Exported `GetScriptRevisionHash` entry point.
        #[export_name = "GetScriptRevisionHash"]
        pub extern "C" fn get_script_revision_hash() -> *const ::std::os::raw::c_char {
            static VALUE: ::std::sync::OnceLock<::std::ffi::CString> =
                ::std::sync::OnceLock::new();
            VALUE
                .get_or_init(|| ::std::ffi::CString::new($hash).unwrap_or_default())
                .as_ptr()
        }

        /// Exported `GetScriptName` entry point.
        #[export_name = "GetScriptName"]
        pub extern "C" fn get_script_name() -> *const ::std::os::raw::c_char {
            static VALUE: ::std::sync::OnceLock<::std::ffi::CString> =
                ::std::sync::OnceLock::new();
            VALUE
                .get_or_init(|| ::std::ffi::CString::new($name).unwrap_or_default())
                .as_ptr()
        }

        /// Exported `AddScripts` entry point.
        #[export_name = "AddScripts"]
        pub extern "C" fn add_scripts() {
            $add();
        }
    };
}
