//! Test utilities for docgen
//!
//! This crate provides shared testing utilities used across the docgen workspace.

pub mod env;
pub mod fixtures;

pub use env::{COMPILER_ENV, ENV_LOCK, lock_env, with_compiler_env};
pub use fixtures::{
    ALICE_DETAILS_NAME, FAKE_PDF_HEADER, FakeCompiler, HASH_DELIMITERS, HELLO_TEMPLATE,
    HELLO_TEMPLATE_NAME, alice_details, b64, fake_pdf_for, hello_alice_rendered,
    register_hello_world_on_disk,
};

use tempfile::TempDir;

/// Creates a temporary directory within `.tmp/` at the project root
///
/// This ensures all test temporary files are centralized in a single location
/// that is gitignored and easy to clean up manually if needed.
///
/// # Panics
///
/// Panics if:
/// - Unable to determine current directory
/// - Unable to create `.tmp/` directory
/// - Unable to create temporary subdirectory
///
/// # Examples
///
/// ```rust
/// use docgen_testkit::temp_dir_in_workspace;
///
/// let temp = temp_dir_in_workspace();
/// let file_path = temp.path().join("registry");
/// std::fs::create_dir_all(&file_path).unwrap();
/// // Cleanup happens automatically when temp is dropped
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Alternative with Result for non-test code
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let workspace_root = std::env::current_dir()?;
    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}

/// Number of entries directly inside `dir`, 0 when it does not exist
///
/// Used to assert that no request workspace outlives its request.
pub fn count_entries(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map(|it| it.count()).unwrap_or(0)
}

/// Like [`count_entries`], but gives background removal up to five seconds
/// to empty `dir` first
///
/// Workspaces dropped on cancellation are removed on the blocking pool.
pub fn count_entries_settled(dir: &std::path::Path) -> usize {
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    loop {
        let count = count_entries(dir);
        if count == 0 || std::time::Instant::now() >= deadline {
            return count;
        }
        std::thread::sleep(std::time::Duration::from_millis(10));
    }
}
