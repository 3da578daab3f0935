//! Entry name validation.
//!
//! The store is a flat namespace: every entry is a single file directly inside
//! the base directory. Anything that could resolve elsewhere is rejected before
//! it reaches the filesystem.

use crate::error::{CacheStoreError, Result};
use std::path::{Component, Path};

/// Validates that `name` is a single, visible file name component.
///
/// Names starting with `.` are reserved for in-flight temporary files.
pub fn validate_entry_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| CacheStoreError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name cannot be empty"));
    }

    if name.contains('\0') {
        return Err(invalid("name contains null bytes"));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(invalid("name must not contain path separators"));
    }

    if name.starts_with('.') {
        return Err(invalid("hidden names are reserved for temporary files"));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => return Err(invalid("name must be a single normal path component")),
    }

    tracing::trace!("Entry name validated: '{}'", name);
    Ok(())
}
