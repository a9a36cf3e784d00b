use std::path::PathBuf;

use clap::Parser;
use snapcmp_diff::DEFAULT_NONE_LABEL;

/// Report file written when `--output` is not given.
pub const DEFAULT_OUTPUT: &str = "differences.json";

#[derive(Debug, Parser)]
#[command(
    name = "snapcmp",
    about = "Compare two directory snapshots and write a JSON difference report",
    version,
)]
pub struct Cli {
    /// Base folder; prompted for when omitted
    pub base: Option<PathBuf>,

    /// Folder compared against the base; prompted for when omitted
    pub compare: Option<PathBuf>,

    /// Where to write the JSON report
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Value written as `different_files` when no file differs
    #[arg(long, default_value = DEFAULT_NONE_LABEL)]
    pub none_label: String,

    #[arg(short, long)]
    pub verbose: bool,

    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
