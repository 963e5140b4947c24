//! Path validation
//!
//! Turns untrusted names into safe filesystem segments and keeps every
//! user-derived path inside its root.

use std::path::{Component, Path, PathBuf};

use crate::error::StorageError;

/// Replacement for every character outside `[A-Za-z0-9._-]`
const PLACEHOLDER: char = '_';

/// Returned when nothing usable survives sanitization
const FALLBACK_NAME: &str = "file";

/// Sanitize an externally supplied filename.
///
/// Keeps only the final path segment, replaces unsafe characters with a
/// single placeholder per run and trims placeholder, dot and space
/// characters from both ends. Total and idempotent; never returns an
/// empty string.
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or("");

    let mut safe = String::with_capacity(base.len());
    for ch in base.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
            safe.push(ch);
        } else if !safe.ends_with(PLACEHOLDER) {
            safe.push(PLACEHOLDER);
        }
    }

    let trimmed = safe.trim_matches(|c| c == PLACEHOLDER || c == '.' || c == ' ');
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Join a relative segment under `root` for a file operation.
///
/// The result must lie strictly inside the root; the root itself is
/// rejected.
pub fn safe_join(root: &Path, relative: &str) -> Result<PathBuf, StorageError> {
    let (root, candidate) = resolve_within(root, relative)?;
    if candidate == root {
        return Err(StorageError::PathEscape(relative.to_string()));
    }
    Ok(candidate)
}

/// Join a relative segment under `root` for a directory lookup.
///
/// Same as [`safe_join`] except that the root itself is accepted.
pub fn safe_join_dir(root: &Path, relative: &str) -> Result<PathBuf, StorageError> {
    resolve_within(root, relative).map(|(_, candidate)| candidate)
}

fn resolve_within(root: &Path, relative: &str) -> Result<(PathBuf, PathBuf), StorageError> {
    let root = root.canonicalize()?;

    let mut candidate = root.clone();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => candidate.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                candidate.pop();
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(StorageError::PathEscape(relative.to_string()));
            }
        }
    }

    // Resolve symlinks for whatever part of the path already exists
    let candidate = match candidate.canonicalize() {
        Ok(real) => real,
        Err(_) => match (candidate.parent(), candidate.file_name()) {
            (Some(parent), Some(name)) => match parent.canonicalize() {
                Ok(real_parent) => real_parent.join(name),
                Err(_) => candidate,
            },
            _ => candidate,
        },
    };

    if !candidate.starts_with(&root) {
        return Err(StorageError::PathEscape(relative.to_string()));
    }

    Ok((root, candidate))
}
