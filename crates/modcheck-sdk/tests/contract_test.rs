//! Tests that the export macro generates entry points matching the
//! contract's signatures and contents.

use std::ffi::CStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use modcheck_sdk::{
    export_script_module, AddScriptsFn, GetScriptNameFn, GetScriptRevisionHashFn,
};

static REGISTRATIONS: AtomicUsize = AtomicUsize::new(0);

fn register_scripts() {
    REGISTRATIONS.fetch_add(1, Ordering::SeqCst);
}

export_script_module! {
    revision_hash: "deadbeef",
    name: "ContractTest",
    add_scripts: register_scripts,
}

#[test]
fn generated_entry_points_match_contract_signatures() {
    // Safe generated functions must coerce to the contract's fn-pointer types.
    let hash_fn: GetScriptRevisionHashFn = get_script_revision_hash;
    let add_fn: AddScriptsFn = add_scripts;
    let name_fn: GetScriptNameFn = get_script_name;

    let hash = unsafe { CStr::from_ptr(hash_fn()) };
    assert_eq!(hash.to_str().unwrap(), "deadbeef");

    let name = unsafe { CStr::from_ptr(name_fn()) };
    assert_eq!(name.to_str().unwrap(), "ContractTest");

    let before = REGISTRATIONS.load(Ordering::SeqCst);
    unsafe { add_fn() };
    assert_eq!(REGISTRATIONS.load(Ordering::SeqCst), before + 1);
}

#[test]
fn generated_strings_are_stable_across_calls() {
    let first = get_script_revision_hash();
    let second = get_script_revision_hash();
    assert_eq!(first, second);
    assert!(!first.is_null());
}
