//! Smoke-test script module for the modcheck harness.
//!
//! Exports the three entry points the harness resolves, plus a small
//! callback-registration surface a host can drive after binding: the host
//! registers two function pointers and the module's registration and
//! `PrintValue` exports call back through them. The business logic is a
//! placeholder; the point of this crate is to exist as a loadable artifact.

use std::os::raw::c_int;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use modcheck_sdk::export_script_module;

/// Build revision baked into this module.
pub const REVISION_HASH: &str = "abc123";

/// Module display name.
pub const MODULE_NAME: &str = "SmokeModule";

/// Host callback taking no arguments.
pub type PrintFn = extern "C" fn();

/// Host callback taking a single integer.
pub type PrintValueFn = extern "C" fn(c_int);

static ADD_SCRIPTS_CALLS: AtomicUsize = AtomicUsize::new(0);
static CALLBACKS: Mutex<Option<(PrintFn, PrintValueFn)>> = Mutex::new(None);

/// Number of times `AddScripts` has run in this process. Exposed on the
/// rlib side so tests can observe the exported entry point's side effect.
pub fn add_scripts_calls() -> usize {
    ADD_SCRIPTS_CALLS.load(Ordering::SeqCst)
}

fn register_scripts() {
    ADD_SCRIPTS_CALLS.fetch_add(1, Ordering::SeqCst);
    // Copy the pointer out before calling: the callback may re-enter
    // `RegisterCallbacks`, which takes the same lock.
    let callback = CALLBACKS
        .lock()
        .ok()
        .and_then(|guard| guard.as_ref().map(|(print, _)| *print));
    if let Some(print) = callback {
        print();
    }
}

export_script_module! {
    revision_hash: REVISION_HASH,
    name: MODULE_NAME,
    add_scripts: register_scripts,
}

/// Exported `GetAddScriptsCallCount` entry point.
///
/// Reports how many times `AddScripts` has run inside this loaded copy of
/// the module. Not part of the required contract; exists so a host test
/// can observe the registration side effect through the library boundary.
#[export_name = "GetAddScriptsCallCount"]
pub extern "C" fn get_add_scripts_call_count() -> usize {
    add_scripts_calls()
}

/// Exported `RegisterCallbacks` entry point.
///
/// Stores the host callbacks later driven by `AddScripts` and `PrintValue`.
#[export_name = "RegisterCallbacks"]
pub extern "C" fn register_callbacks(print: PrintFn, print_value: PrintValueFn) {
    if let Ok(mut guard) = CALLBACKS.lock() {
        *guard = Some((print, print_value));
    }
}

/// Exported `PrintValue` entry point.
///
/// Forwards `value` to the registered value callback; a no-op until
/// `RegisterCallbacks` has run.
#[export_name = "PrintValue"]
pub extern "C" fn print_value(value: c_int) {
    let callback = CALLBACKS
        .lock()
        .ok()
        .and_then(|guard| guard.as_ref().map(|(_, print_value)| *print_value));
    if let Some(print_value) = callback {
        print_value(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;
    use std::sync::atomic::AtomicI32;

    static PRINT_HITS: AtomicUsize = AtomicUsize::new(0);
    static LAST_VALUE: AtomicI32 = AtomicI32::new(0);

    extern "C" fn host_print() {
        PRINT_HITS.fetch_add(1, Ordering::SeqCst);
    }

    extern "C" fn host_print_value(value: c_int) {
        LAST_VALUE.store(value, Ordering::SeqCst);
    }

    extern "C" fn reentrant_print() {
        PRINT_HITS.fetch_add(1, Ordering::SeqCst);
        // Re-enters the registration lock from inside the callback.
        register_callbacks(host_print, host_print_value);
    }

    #[test]
    fn identity_exports_return_the_baked_in_strings() {
        let hash = unsafe { CStr::from_ptr(get_script_revision_hash()) };
        assert_eq!(hash.to_str().unwrap(), REVISION_HASH);

        let name = unsafe { CStr::from_ptr(get_script_name()) };
        assert_eq!(name.to_str().unwrap(), MODULE_NAME);
    }

    #[test]
    fn add_scripts_bumps_the_call_counter() {
        // Tests in this module share the counter, so assert growth rather
        // than an exact total.
        let before = add_scripts_calls();
        add_scripts();
        assert!(add_scripts_calls() > before);
    }

    #[test]
    fn registered_callbacks_are_driven_and_may_reenter_registration() {
        register_callbacks(reentrant_print, host_print_value);

        let hits_before = PRINT_HITS.load(Ordering::SeqCst);
        // The callback re-registers from inside `AddScripts`; this hangs if
        // the export still holds the callback lock while calling out.
        add_scripts();
        assert!(PRINT_HITS.load(Ordering::SeqCst) > hits_before);

        print_value(42);
        assert_eq!(LAST_VALUE.load(Ordering::SeqCst), 42);
    }
}
