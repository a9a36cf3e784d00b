//! Divergence locator and change extractor.
//!
//! Finds the first relative path (in sorted order) whose child directories
//! differ between the two trees, then reports added and removed
//! subdirectories for that anchor and its direct children only. Deeper
//! differences are deliberately left out of the report.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::prune::deep_prune;
use crate::relpath;
use crate::structure::DirectoryStructure;

/// Subdirectories added and removed under one parent path.
///
/// Each name maps to the names of its own immediate subdirectories, giving
/// one level of extra context.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    /// Directories present only in the compare tree.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub new: BTreeMap<String, Vec<String>>,
    /// Directories present only in the base tree.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub deleted: BTreeMap<String, Vec<String>>,
}

impl ChangeEntry {
    /// Returns `true` if nothing was added or removed.
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.deleted.is_empty()
    }

    /// Number of added plus removed directories.
    pub fn len(&self) -> usize {
        self.new.len() + self.deleted.len()
    }
}

/// Change entries keyed by parent path. The tree root is keyed by `""`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeMap {
    entries: BTreeMap<String, ChangeEntry>,
}

impl ChangeMap {
    /// Create an empty change map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a change map from a raw JSON value, deep-pruning it first so
    /// that no vacuous entry survives.
    pub fn from_raw(raw: Value) -> Self {
        match deep_prune(raw) {
            // The pruned value keeps the shape produced by `extract_changes`.
            Some(pruned) => serde_json::from_value(pruned).unwrap_or_default(),
            None => Self::new(),
        }
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of parent paths with changes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entry for a parent key.
    pub fn get(&self, key: &str) -> Option<&ChangeEntry> {
        self.entries.get(key)
    }

    /// Iterate over `(parent key, entry)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChangeEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Total number of added and removed directories across all entries.
    pub fn total_changes(&self) -> usize {
        self.entries.values().map(ChangeEntry::len).sum()
    }
}

/// Find the first path, in sorted order over the union of both trees,
/// whose child directories differ.
pub fn find_anchor(base: &DirectoryStructure, compare: &DirectoryStructure) -> Option<String> {
    union_paths(base, compare)
        .into_iter()
        .find(|path| !same_children(base, compare, path))
        .map(str::to_string)
}

/// Returns `true` if `path` is the anchor itself or a direct child of it.
///
/// Depth is measured in path components, so `a/b` is a child of `a` but
/// `ab` and `a/b/c` are not.
pub fn is_in_neighborhood(anchor: &str, path: &str) -> bool {
    path == anchor || relpath::parent(path) == Some(anchor)
}

/// Compute the change map for two scanned trees.
///
/// `base_root` and `compare_root` are read again to list the subdirectories
/// of each added or removed directory.
pub fn extract_changes(
    base_root: &Path,
    compare_root: &Path,
    base: &DirectoryStructure,
    compare: &DirectoryStructure,
) -> ChangeMap {
    let Some(anchor) = find_anchor(base, compare) else {
        debug!("directory structures are identical");
        return ChangeMap::new();
    };
    info!(anchor = %anchor, "first structural divergence");

    let mut raw = Map::new();
    for path in union_paths(base, compare) {
        if !is_in_neighborhood(&anchor, path) {
            continue;
        }

        let before = base.children(path);
        let after = compare.children(path);
        if before == after {
            continue;
        }

        let new = describe(compare_root, path, after.difference(&before));
        let deleted = describe(base_root, path, before.difference(&after));
        debug!(path, new = new.len(), deleted = deleted.len(), "directory set changed");

        raw.insert(
            relpath::change_key(path),
            json!({ "new": new, "deleted": deleted }),
        );
    }

    ChangeMap::from_raw(Value::Object(raw))
}

fn union_paths<'a>(base: &'a DirectoryStructure, compare: &'a DirectoryStructure) -> BTreeSet<&'a str> {
    base.paths().chain(compare.paths()).collect()
}

fn same_children(base: &DirectoryStructure, compare: &DirectoryStructure, path: &str) -> bool {
    match (base.get(path), compare.get(path)) {
        (Some(a), Some(b)) => a == b,
        (Some(only), None) | (None, Some(only)) => only.is_empty(),
        (None, None) => true,
    }
}

fn describe<'a>(
    root: &Path,
    parent: &str,
    names: impl Iterator<Item = &'a String>,
) -> BTreeMap<String, Vec<String>> {
    names
        .map(|name| {
            let dir = relpath::resolve(root, &relpath::join(parent, name));
            (name.clone(), list_subdirs(&dir))
        })
        .collect()
}

/// Sorted names of the immediate subdirectories of `dir`. Unreadable or
/// missing directories have none.
fn list_subdirs(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "cannot list subdirectories");
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mkdirs(root: &Path, dirs: &[&str]) {
        for d in dirs {
            fs::create_dir_all(root.join(d)).unwrap();
        }
    }

    fn run(base: &Path, compare: &Path) -> ChangeMap {
        let a = DirectoryStructure::scan(base);
        let b = DirectoryStructure::scan(compare);
        extract_changes(base, compare, &a, &b)
    }

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn neighborhood_uses_components() {
        assert!(is_in_neighborhood(".", "."));
        assert!(is_in_neighborhood(".", "a"));
        assert!(!is_in_neighborhood(".", "a/b"));
        assert!(is_in_neighborhood("a", "a"));
        assert!(is_in_neighborhood("a", "a/b"));
        assert!(!is_in_neighborhood("a", "ab"));
        assert!(!is_in_neighborhood("a", "ab/c"));
        assert!(!is_in_neighborhood("a", "a/b/c"));
        assert!(!is_in_neighborhood("a", "b"));
    }

    #[test]
    fn anchor_is_first_sorted_divergence() {
        let base: DirectoryStructure = [
            (".", vec!["a", "b"]),
            ("a", vec![]),
            ("b", vec!["q"]),
            ("b/q", vec![]),
        ]
        .into_iter()
        .collect();
        let compare: DirectoryStructure = [
            (".", vec!["a", "b"]),
            ("a", vec!["p"]),
            ("a/p", vec![]),
            ("b", vec![]),
        ]
        .into_iter()
        .collect();

        assert_eq!(find_anchor(&base, &compare).as_deref(), Some("a"));
    }

    #[test]
    fn no_anchor_for_equal_structures() {
        let s: DirectoryStructure = [(".", vec!["a"]), ("a", vec![])].into_iter().collect();
        assert_eq!(find_anchor(&s, &s.clone()), None);
    }

    #[test]
    fn missing_entry_equals_empty_child_set() {
        let base: DirectoryStructure = [(".", Vec::<&str>::new())].into_iter().collect();
        let compare: DirectoryStructure =
            [(".", Vec::<&str>::new()), ("ghost", Vec::<&str>::new())].into_iter().collect();
        assert_eq!(find_anchor(&base, &compare), None);
    }

    #[test]
    fn identical_trees_have_no_changes() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        mkdirs(a.path(), &["x/y", "z"]);
        mkdirs(b.path(), &["x/y", "z"]);

        let changes = run(a.path(), b.path());
        assert!(changes.is_empty());
        assert_eq!(changes.total_changes(), 0);
    }

    #[test]
    fn new_empty_directory_is_pruned() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        mkdirs(b.path(), &["X"]);

        let changes = run(a.path(), b.path());
        assert!(changes.is_empty());
        assert_eq!(changes.total_changes(), 0);
    }

    #[test]
    fn new_directory_lists_its_children() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        mkdirs(b.path(), &["X/Y"]);

        let changes = run(a.path(), b.path());
        assert_eq!(changes.len(), 1);
        let root = changes.get("").unwrap();
        assert_eq!(root.new.get("X"), Some(&list(&["Y"])));
        assert!(root.deleted.is_empty());
        assert_eq!(changes.total_changes(), 1);
    }

    #[test]
    fn deleted_directory_lists_its_children() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        mkdirs(a.path(), &["keep", "old/sub2", "old/sub1"]);
        mkdirs(b.path(), &["keep"]);

        let changes = run(a.path(), b.path());
        let root = changes.get("").unwrap();
        assert_eq!(root.deleted.get("old"), Some(&list(&["sub1", "sub2"])));
        assert!(root.new.is_empty());
    }

    #[test]
    fn changes_limited_to_anchor_neighborhood() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        mkdirs(a.path(), &["a/x", "b/c"]);
        mkdirs(
            b.path(),
            &["a/x/deep/deeper/deepest", "a/new/inner", "b/c/z/zz"],
        );

        let changes = run(a.path(), b.path());
        let keys: Vec<&str> = changes.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "a/x"]);

        assert_eq!(changes.get("a").unwrap().new.get("new"), Some(&list(&["inner"])));
        assert_eq!(changes.get("a/x").unwrap().new.get("deep"), Some(&list(&["deeper"])));
        assert!(changes.get("a/x/deep").is_none());
        assert!(changes.get("b/c").is_none());
        assert_eq!(changes.total_changes(), 2);
    }

    #[test]
    fn missing_base_tree_reports_compare_directories() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        mkdirs(b.path(), &["app/bin"]);

        let changes = run(&a.path().join("missing"), b.path());
        let root = changes.get("").unwrap();
        assert_eq!(root.new.get("app"), Some(&list(&["bin"])));
    }

    #[test]
    fn serializes_without_empty_members() {
        let raw = json!({ "": { "new": { "X": ["Y"] }, "deleted": {} } });
        let changes = ChangeMap::from_raw(raw);
        let out = serde_json::to_value(&changes).unwrap();
        assert_eq!(out, json!({ "": { "new": { "X": ["Y"] } } }));
    }
}
