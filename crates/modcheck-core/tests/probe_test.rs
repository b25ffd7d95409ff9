//! Integration tests for the probe pipeline against the real filesystem
//! and native loader, pinning down the failure taxonomy. Bind-level
//! success paths are covered by the in-crate fakes; probe-level success
//! against the built smoke module lives in `smoke_module_probe_test.rs`.

use std::fs;
use std::path::Path;

use modcheck_core::{probe, probe_cached, LibraryLoader, ProbeError};

#[test]
fn empty_path_is_rejected_before_any_os_call() {
    let loader = LibraryLoader::new();
    let err = probe(&loader, Path::new("")).unwrap_err();
    assert!(matches!(err, ProbeError::EmptyPath));
}

#[test]
fn nonexistent_path_fails_with_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no_such_module.so");

    let loader = LibraryLoader::new();
    let err = probe(&loader, &missing).unwrap_err();

    match err {
        ProbeError::NotFound { path } => assert_eq!(path, missing),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn non_library_file_fails_with_open_failed() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("bogus_module.so");
    fs::write(&bogus, b"this is a text file, not a shared object").unwrap();

    let loader = LibraryLoader::new();
    let err = probe(&loader, &bogus).unwrap_err();

    match err {
        ProbeError::OpenFailed {
            path, cache_path, ..
        } => {
            assert_eq!(path, bogus);
            assert!(cache_path.is_none());
        }
        other => panic!("expected OpenFailed, got {other:?}"),
    }
}

#[test]
fn cached_probe_checks_the_cache_path_for_existence() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("module.so");
    let cache = dir.path().join("module.cached.so");

    let loader = LibraryLoader::new();
    let err = probe_cached(&loader, &original, &cache).unwrap_err();

    match err {
        ProbeError::NotFound { path } => assert_eq!(path, cache),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn cached_probe_open_failure_names_both_paths() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("module.so");
    let cache = dir.path().join("module.cached.so");
    fs::write(&cache, b"garbage").unwrap();

    let loader = LibraryLoader::new();
    let err = probe_cached(&loader, &original, &cache).unwrap_err();

    match err {
        ProbeError::OpenFailed {
            path, cache_path, ..
        } => {
            assert_eq!(path, original);
            assert_eq!(cache_path.as_deref(), Some(cache.as_path()));
        }
        other => panic!("expected OpenFailed, got {other:?}"),
    }
    // The failed open never unloaded anything, so the cached copy stays.
    assert!(cache.exists());
}
