use serde::{Deserialize, Serialize};

/// Value written in place of the differing-files list when every shared
/// file is byte-identical.
pub const DEFAULT_NONE_LABEL: &str = "没有";

/// Options controlling a comparison run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareOptions {
    /// Sentinel emitted as `different_files` when no file differs.
    pub none_label: String,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            none_label: DEFAULT_NONE_LABEL.to_string(),
        }
    }
}

impl CompareOptions {
    /// Replace the "no differing files" sentinel.
    pub fn with_none_label(mut self, label: impl Into<String>) -> Self {
        self.none_label = label.into();
        self
    }
}
