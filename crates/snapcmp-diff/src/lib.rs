//! Diff engine for snapcmp.
//!
//! Compares two directory snapshots and produces a structured report:
//! subdirectories added or removed around the first point of divergence,
//! and files whose contents differ between the two trees.
//!
//! # Key Types
//!
//! - [`DirectoryStructure`] -- Per-tree map of relative directory path to child directory names
//! - [`ChangeMap`] / [`ChangeEntry`] -- Added/removed subdirectories near the divergence anchor
//! - [`DifferentFiles`] -- Files present in both trees whose bytes differ
//! - [`ComparisonReport`] -- The assembled, serializable result

pub mod changes;
pub mod config;
pub mod content;
pub mod error;
pub mod prune;
pub mod relpath;
pub mod report;
pub mod structure;

pub use changes::{extract_changes, find_anchor, is_in_neighborhood, ChangeEntry, ChangeMap};
pub use config::{CompareOptions, DEFAULT_NONE_LABEL};
pub use content::{diff_contents, files_identical, DifferentFiles};
pub use error::{DiffError, DiffResult};
pub use prune::deep_prune;
pub use report::{compare_folders, ComparisonInfo, ComparisonReport, Differences};
pub use structure::DirectoryStructure;
