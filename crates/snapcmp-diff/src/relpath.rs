//! Relative path convention shared by the scanner, the change extractor and
//! the content differ.
//!
//! Relative paths are strings whose components are joined with `/` on every
//! platform. The root of a tree is `"."`. Depth is the number of components,
//! so the neighborhood bound does not depend on the native separator.

use std::path::{Component, Path, PathBuf};

/// Relative path of a tree root.
pub const ROOT: &str = ".";

/// Separator used between relative path components.
pub const SEPARATOR: char = '/';

/// Convert a path relative to a tree root into the canonical string form.
///
/// Only normal components are kept; an empty path (or one made of `.`
/// components) maps to [`ROOT`].
pub fn from_path(rel: &Path) -> String {
    let parts: Vec<_> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        ROOT.to_string()
    } else {
        parts.join("/")
    }
}

/// Number of components in a relative path. The root has depth 0.
pub fn depth(path: &str) -> usize {
    if path == ROOT || path.is_empty() {
        0
    } else {
        path.split(SEPARATOR).count()
    }
}

/// Parent of a relative path, or `None` for the root.
pub fn parent(path: &str) -> Option<&str> {
    if path == ROOT || path.is_empty() {
        return None;
    }
    match path.rsplit_once(SEPARATOR) {
        Some((head, _)) => Some(head),
        None => Some(ROOT),
    }
}

/// Append a child name to a relative path.
pub fn join(parent: &str, name: &str) -> String {
    if parent == ROOT || parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}{SEPARATOR}{name}")
    }
}

/// Resolve a relative path against a native root directory.
pub fn resolve(root: &Path, rel: &str) -> PathBuf {
    let mut out = root.to_path_buf();
    if rel != ROOT {
        out.extend(rel.split(SEPARATOR).filter(|p| !p.is_empty()));
    }
    out
}

/// Key under which a path is reported in the change map: the root is the
/// empty string, every other path is itself.
pub fn change_key(path: &str) -> String {
    if path == ROOT {
        String::new()
    } else {
        path.to_string()
    }
}
