//! Structure scanner: record the immediate subdirectories of every directory
//! in a tree.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::relpath;

/// Mapping from relative directory path to the names of its immediate
/// child directories.
///
/// The root is stored under `"."`. A tree that could not be read at all is
/// represented by an empty structure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectoryStructure {
    dirs: BTreeMap<String, BTreeSet<String>>,
}

impl DirectoryStructure {
    /// Create an empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `root` and record every directory reachable under it, including
    /// empty ones. Files and symbolic links are ignored.
    pub fn scan(root: &Path) -> Self {
        let mut dirs: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    debug!(root = %root.display(), error = %e, "tree root not readable, treating as empty");
                    continue;
                }
                Err(e) => {
                    warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            let Ok(rel) = entry.path().strip_prefix(root) else {
                continue;
            };
            let rel = relpath::from_path(rel);

            if let Some(parent) = relpath::parent(&rel) {
                let name = entry.file_name().to_string_lossy().into_owned();
                dirs.entry(parent.to_string()).or_default().insert(name);
            }
            dirs.entry(rel).or_default();
        }

        debug!(root = %root.display(), directories = dirs.len(), "scanned tree structure");
        Self { dirs }
    }

    /// Child directory names at `path`, if the path is known.
    pub fn get(&self, path: &str) -> Option<&BTreeSet<String>> {
        self.dirs.get(path)
    }

    /// Child directory names at `path`; an unknown path has no children.
    pub fn children(&self, path: &str) -> BTreeSet<String> {
        self.dirs.get(path).cloned().unwrap_or_default()
    }

    /// Returns `true` if `path` is a directory of this tree.
    pub fn contains(&self, path: &str) -> bool {
        self.dirs.contains_key(path)
    }

    /// All known relative directory paths, in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.dirs.keys().map(String::as_str)
    }

    /// Number of directories recorded.
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    /// Returns `true` if no directory was recorded.
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

impl<P, C> FromIterator<(P, C)> for DirectoryStructure
where
    P: Into<String>,
    C: IntoIterator,
    C::Item: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let dirs = iter
            .into_iter()
            .map(|(path, children)| {
                (path.into(), children.into_iter().map(Into::into).collect())
            })
            .collect();
        Self { dirs }
    }
}
