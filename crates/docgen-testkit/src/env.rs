//! Environment isolation utilities for testing
//!
//! Compiler discovery consults the `DOCGEN_COMPILER` environment variable.
//! Tests that set it must not overlap, so every mutation happens under
//! [`ENV_LOCK`] and the previous value is restored afterwards.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Environment variable pointing at the compiler executable
pub const COMPILER_ENV: &str = "DOCGEN_COMPILER";

/// Static mutex to serialize tests that modify environment variables
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Acquire [`ENV_LOCK`], recovering from poisoning left by a panicking test
pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Run `f` with `DOCGEN_COMPILER` set to `compiler`, or unset when `None`
///
/// # Examples
///
/// ```no_run
/// use docgen_testkit::with_compiler_env;
/// use std::path::Path;
///
/// with_compiler_env(Some(Path::new("/opt/texlive/bin/pdflatex")), || {
///     // compiler discovery picks up the override here
/// });
/// ```
pub fn with_compiler_env<F, R>(compiler: Option<&Path>, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = lock_env();
    let original = std::env::var_os(COMPILER_ENV);

    // SAFETY: ENV_LOCK is held, so no other test touches the environment
    // concurrently.
    unsafe {
        match compiler {
            Some(path) => std::env::set_var(COMPILER_ENV, path),
            None => std::env::remove_var(COMPILER_ENV),
        }
    }

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

    // SAFETY: still holding ENV_LOCK.
    unsafe {
        match original {
            Some(value) => std::env::set_var(COMPILER_ENV, value),
            None => std::env::remove_var(COMPILER_ENV),
        }
    }

    match result {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
