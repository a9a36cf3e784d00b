//! Result assembly: run every phase and build the serializable report.

use std::fs;
use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::changes::{extract_changes, ChangeMap};
use crate::config::CompareOptions;
use crate::content::{diff_contents, DifferentFiles};
use crate::error::{DiffError, DiffResult};
use crate::structure::DirectoryStructure;

/// Timestamp layout used in [`ComparisonInfo`].
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The complete output of one comparison run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub comparison_info: ComparisonInfo,
    pub differences: Differences,
}

/// Which trees were compared, and when.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonInfo {
    pub base_folder: String,
    pub compare_folder: String,
    /// Local time with second resolution, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
}

/// Structural and content differences between the two trees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Differences {
    pub changes: ChangeMap,
    pub total_changes: usize,
    pub different_files: DifferentFiles,
}

impl Differences {
    /// Combine a change map and the differing files; `total_changes` is
    /// derived from the map.
    pub fn new(changes: ChangeMap, different_files: DifferentFiles) -> Self {
        let total_changes = changes.total_changes();
        Self {
            changes,
            total_changes,
            different_files,
        }
    }

    /// Returns `true` if neither structure nor contents differ.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.different_files.is_empty()
    }
}

/// Compare the tree at `base` against the tree at `compare`.
///
/// Never fails: unreadable trees, directories and files degrade to "absent"
/// or "different" as documented on each phase.
pub fn compare_folders(base: &Path, compare: &Path, options: &CompareOptions) -> ComparisonReport {
    info!(base = %base.display(), compare = %compare.display(), "comparing folders");

    let base_structure = DirectoryStructure::scan(base);
    let compare_structure = DirectoryStructure::scan(compare);
    let changes = extract_changes(base, compare, &base_structure, &compare_structure);

    let different_files = DifferentFiles::from_paths(diff_contents(base, compare), &options.none_label);

    let differences = Differences::new(changes, different_files);
    info!(
        total_changes = differences.total_changes,
        different_files = differences.different_files.paths().len(),
        "comparison finished"
    );

    ComparisonReport {
        comparison_info: ComparisonInfo {
            base_folder: base.display().to_string(),
            compare_folder: compare.display().to_string(),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        },
        differences,
    }
}

impl ComparisonReport {
    /// Render as pretty-printed JSON. Non-ASCII text is written literally.
    pub fn to_json(&self) -> DiffResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON report to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> DiffResult<()> {
        let json = self.to_json()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| DiffError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, json).map_err(|source| DiffError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
