//! Path validation for artifact identifiers and workspace file names
//!
//! Registered artifacts live flat inside the storage root, and resources are
//! written flat inside a request workspace. Any identifier that reaches the
//! filesystem must therefore be exactly one normal path component: no
//! separators, no `.`/`..`, no root or drive prefix.
//!
//! Component-based analysis is used instead of `Path::is_absolute()`, which
//! treats `/tmp` as relative on Windows.

use anyhow::{bail, Result};
use std::borrow::Cow;
use std::path::{Component, Path};

/// Check if path is absolute OR rooted (cross-platform)
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
/// use docgen_core::path::has_absolute_or_rooted_component;
///
/// assert!(has_absolute_or_rooted_component(Path::new("/etc/passwd")));
/// assert!(!has_absolute_or_rooted_component(Path::new("hello-world.tex")));
/// ```
pub fn has_absolute_or_rooted_component(path: &Path) -> bool {
    if path.is_absolute() {
        return true;
    }

    path.components()
        .any(|c| matches!(c, Component::RootDir | Component::Prefix(_)))
}

/// Check if path is safe for use as a single file name
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
/// use docgen_core::path::is_safe_single_component;
///
/// assert!(is_safe_single_component(Path::new("logo.png")).is_ok());
/// assert!(is_safe_single_component(Path::new("../logo.png")).is_err());
/// assert!(is_safe_single_component(Path::new("img/logo.png")).is_err());
/// ```
pub fn is_safe_single_component(path: &Path) -> Result<()> {
    if has_absolute_or_rooted_component(path) {
        bail!("Path cannot be absolute or rooted: '{}'", path.display());
    }

    let mut normal_count = 0;

    for component in path.components() {
        match component {
            Component::Normal(_) => normal_count += 1,
            Component::Prefix(_) => {
                bail!("Path cannot contain drive prefix: '{}'", path.display())
            }
            Component::RootDir => {
                bail!("Path cannot be absolute or rooted: '{}'", path.display())
            }
            Component::CurDir => {
                bail!(
                    "Path cannot contain current directory (.): '{}'",
                    path.display()
                )
            }
            Component::ParentDir => {
                bail!(
                    "Path cannot contain parent directory (..): '{}'",
                    path.display()
                )
            }
        }
    }

    if normal_count != 1 {
        bail!(
            "Path must be a single component, found {}: '{}'",
            normal_count,
            path.display()
        );
    }

    Ok(())
}

/// Validate a client-supplied artifact name.
///
/// Stricter than [`is_safe_single_component`]: `Path::components` silently
/// drops trailing separators and interior `.`, so the raw string is checked
/// for separators and NUL bytes as well.
pub fn validate_artifact_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Artifact name cannot be empty");
    }
    if name.contains(['/', '\\', '\0']) {
        bail!("Artifact name cannot contain separators or NUL: '{}'", name);
    }
    is_safe_single_component(Path::new(name))
}

/// File name a registered identifier is stored under on disk.
///
/// Template identifiers carry their delimiter suffix, which may contain
/// separators. `%`, `/`, `\` and NUL are percent-escaped so every
/// identifier maps to exactly one flat file and distinct ids never collide.
pub fn disk_file_name(id: &str) -> Cow<'_, str> {
    if !id.contains(['%', '/', '\\', '\0']) {
        return Cow::Borrowed(id);
    }
    let mut escaped = String::with_capacity(id.len() + 8);
    for c in id.chars() {
        match c {
            '%' | '/' | '\\' | '\0' => escaped.push_str(&format!("%{:02X}", c as u32)),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
