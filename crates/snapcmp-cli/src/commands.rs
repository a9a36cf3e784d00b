use std::io::{self, BufRead, Write};
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context};
use colored::Colorize;
use snapcmp_diff::{compare_folders, CompareOptions, ComparisonReport};

use crate::cli::{Cli, OutputFormat};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let stdin = io::stdin();
    run_with_io(cli, &mut stdin.lock(), &mut io::stdout())
}

/// Run a comparison, prompting on `input`/`output` for any root path that
/// was not given on the command line.
pub fn run_with_io(
    cli: Cli,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> anyhow::Result<()> {
    let base = match cli.base {
        Some(path) => path,
        None => prompt_path(input, output, "Full path of the base folder: ")?,
    };
    let compare = match cli.compare {
        Some(path) => path,
        None => prompt_path(input, output, "Full path of the folder to compare: ")?,
    };

    let base = normalize(&base).with_context(|| format!("cannot resolve {}", base.display()))?;
    let compare =
        normalize(&compare).with_context(|| format!("cannot resolve {}", compare.display()))?;
    let destination = normalize(&cli.output)
        .with_context(|| format!("cannot resolve {}", cli.output.display()))?;

    let options = CompareOptions::default().with_none_label(cli.none_label);
    let report = compare_folders(&base, &compare, &options);
    report
        .write_to(&destination)
        .with_context(|| format!("failed to write report to {}", destination.display()))?;

    match cli.format {
        OutputFormat::Text => print_summary(output, &report, &destination)?,
        OutputFormat::Json => {
            writeln!(output, "{}", report.to_json()?)?;
            eprintln!("Comparison written to {}", destination.display());
        }
    }
    Ok(())
}

fn print_summary(
    output: &mut impl Write,
    report: &ComparisonReport,
    destination: &Path,
) -> anyhow::Result<()> {
    let differences = &report.differences;
    if differences.is_empty() {
        writeln!(output, "{} No differences found.", "✓".green().bold())?;
    } else {
        for (parent, entry) in differences.changes.iter() {
            let parent = if parent.is_empty() { "." } else { parent };
            for name in entry.new.keys() {
                writeln!(output, "  {} {}/{}", "new:".green(), parent, name)?;
            }
            for name in entry.deleted.keys() {
                writeln!(output, "  {} {}/{}", "deleted:".red(), parent, name)?;
            }
        }
        for path in differences.different_files.paths() {
            writeln!(output, "  {} {}", "differs:".yellow(), path)?;
        }
        writeln!(
            output,
            "{} directory changes, {} different files",
            differences.total_changes.to_string().bold(),
            differences.different_files.paths().len().to_string().bold(),
        )?;
    }
    writeln!(
        output,
        "Comparison written to {}",
        destination.display().to_string().bold()
    )?;
    Ok(())
}

fn prompt_path(
    input: &mut impl BufRead,
    output: &mut impl Write,
    message: &str,
) -> anyhow::Result<PathBuf> {
    write!(output, "{message}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line).context("failed to read path")? == 0 {
        bail!("no path entered");
    }
    let path = line.trim();
    if path.is_empty() {
        bail!("no path entered");
    }
    Ok(PathBuf::from(path))
}

/// Make `path` absolute and remove `.` and `..` components lexically. The
/// path does not need to exist.
fn normalize(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    Ok(out)
}
