//! Content differ: byte-exact comparison of files present in both trees.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::relpath;

/// Read buffer size used when comparing file contents.
const CHUNK_SIZE: usize = 64 * 1024;

/// Files whose contents differ between the two trees.
///
/// Serializes either as a sorted array of relative paths or, when nothing
/// differs, as a single sentinel string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DifferentFiles {
    /// Sorted `/`-separated paths relative to the tree roots.
    Paths(Vec<String>),
    /// No shared file differs; holds the sentinel label.
    NoneFound(String),
}

impl DifferentFiles {
    /// Wrap a list of differing paths, substituting `none_label` when the
    /// list is empty.
    pub fn from_paths(mut paths: Vec<String>, none_label: &str) -> Self {
        if paths.is_empty() {
            Self::NoneFound(none_label.to_string())
        } else {
            paths.sort();
            Self::Paths(paths)
        }
    }

    /// The differing paths; empty for the sentinel.
    pub fn paths(&self) -> &[String] {
        match self {
            Self::Paths(paths) => paths,
            Self::NoneFound(_) => &[],
        }
    }

    /// Returns `true` if no file differs.
    pub fn is_empty(&self) -> bool {
        self.paths().is_empty()
    }
}

/// Compare every file under `base_root` with the file at the same relative
/// path under `compare_root`.
///
/// Files without a counterpart are skipped. A comparison that fails counts
/// as a difference. The result is sorted.
pub fn diff_contents(base_root: &Path, compare_root: &Path) -> Vec<String> {
    let mut different = Vec::new();
    let mut compared = 0usize;

    for entry in WalkDir::new(base_root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                debug!(root = %base_root.display(), error = %e, "base tree not readable");
                continue;
            }
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(rel) = entry.path().strip_prefix(base_root) else {
            continue;
        };
        let rel = relpath::from_path(rel);
        let counterpart = relpath::resolve(compare_root, &rel);
        if !counterpart.exists() {
            continue;
        }

        compared += 1;
        match files_identical(entry.path(), &counterpart) {
            Ok(true) => {}
            Ok(false) => {
                debug!(path = %rel, "contents differ");
                different.push(rel);
            }
            Err(e) => {
                warn!(path = %rel, error = %e, "comparison failed, counting as different");
                different.push(rel);
            }
        }
    }

    different.sort();
    info!(compared, different = different.len(), "compared file contents");
    different
}

/// Returns `true` if both paths are regular files with identical bytes.
///
/// Sizes are checked first; contents are then compared chunk by chunk.
pub fn files_identical(a: &Path, b: &Path) -> io::Result<bool> {
    let meta_a = fs::metadata(a)?;
    let meta_b = fs::metadata(b)?;
    if !meta_a.is_file() || !meta_b.is_file() || meta_a.len() != meta_b.len() {
        return Ok(false);
    }

    let mut file_a = File::open(a)?;
    let mut file_b = File::open(b)?;
    let mut buf_a = vec![0u8; CHUNK_SIZE];
    let mut buf_b = vec![0u8; CHUNK_SIZE];

    loop {
        let n = read_chunk(&mut file_a, &mut buf_a)?;
        let m = read_chunk(&mut file_b, &mut buf_b)?;
        if n != m || buf_a[..n] != buf_b[..m] {
            return Ok(false);
        }
        if n == 0 {
            return Ok(true);
        }
    }
}

/// Fill `buf` as far as the reader allows. Returns the number of bytes read;
/// fewer than `buf.len()` only at end of file.
fn read_chunk(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
