//! Human and JSON output of command results

use super::OutputFormat;
use anyhow::Result;
use samurai_foundation::ModuleId;
use samurai_rewrite::RunReport;
use std::path::{Path, PathBuf};

/// `path` relative to the workspace when possible
fn display(path: &Path, workspace: &Path) -> String {
    pathdiff::diff_paths(path, workspace)
        .filter(|relative| !relative.starts_with(".."))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

/// Print a run summary to stdout and its diagnostics to stderr
pub fn print_run(report: &RunReport, workspace: &Path, format: OutputFormat) -> Result<()> {
    for diagnostic in &report.diagnostics {
        eprintln!("error: {}", diagnostic.message);
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Pretty => {
            let verb = if report.written {
                "rewrote"
            } else {
                "would rewrite"
            };
            for path in &report.files_changed {
                println!("{} {}", verb, display(path, workspace));
            }
            println!(
                "{} files scanned, {} changed, {} imports rewritten, {} errors",
                report.files_scanned,
                report.files_changed.len(),
                report.modifications,
                report.diagnostics.len()
            );
        }
    }

    Ok(())
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Resolution<'a> {
    file: &'a Path,
    module: PathBuf,
    public_entry: &'a str,
}

pub fn print_resolution(
    file: &Path,
    module: &ModuleId,
    entry: &str,
    workspace: &Path,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let resolution = Resolution {
                file,
                module: module.marker().to_path_buf(),
                public_entry: entry,
            };
            println!("{}", serde_json::to_string_pretty(&resolution)?);
        }
        OutputFormat::Pretty => {
            println!("module: {}", display(module.marker(), workspace));
            println!("entry:  {}", entry);
        }
    }
    Ok(())
}
