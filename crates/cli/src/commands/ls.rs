//! ls command - List a directory
//!
//! Lists the files and sub-directories below a path. A file target lists
//! just that file.

use clap::Args;
use comfy_table::{presets, Cell, CellAlignment, Table};
use serde::Serialize;

use bucketfs_core::Entry;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// List a directory
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Target (alias/bucket[/path])
    pub target: String,

    /// List every nested file and directory
    #[arg(short, long)]
    pub recursive: bool,

    /// Show totals after the listing
    #[arg(long)]
    pub summarize: bool,
}

/// Output structure for ls command (JSON format)
#[derive(Debug, Serialize)]
struct LsOutput {
    target: String,
    entries: Vec<Entry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

#[derive(Debug, Serialize)]
struct Summary {
    files: usize,
    directories: usize,
    total_size_bytes: i64,
    total_size_human: String,
}

impl Summary {
    fn of(entries: &[Entry]) -> Self {
        let files = entries.iter().filter(|e| !e.is_dir).count();
        let total_size_bytes: i64 = entries.iter().filter(|e| !e.is_dir).map(|e| e.size).sum();
        Self {
            files,
            directories: entries.len() - files,
            total_size_bytes,
            total_size_human: humansize::format_size(
                total_size_bytes.max(0) as u64,
                humansize::BINARY,
            ),
        }
    }
}

/// Execute the ls command
pub async fn execute(args: LsArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (remote, namespace) = match super::connect(&args.target).await {
        Ok(connected) => connected,
        Err(e) => return super::fail(&formatter, "Cannot open target", &e),
    };
    let path = remote.path.as_str();

    let entries = match namespace.stat(path).await {
        Ok(None) => {
            formatter.error(&format!("No such file or directory: {remote}"));
            return ExitCode::NotFound;
        }
        Ok(Some(entry)) if !entry.is_dir => vec![entry],
        Ok(Some(_)) => match namespace.list_dir(path, args.recursive).await {
            Ok(entries) => entries,
            Err(e) => return super::fail(&formatter, "Failed to list directory", &e),
        },
        Err(e) => return super::fail(&formatter, "Failed to stat target", &e),
    };

    let summary = args.summarize.then(|| Summary::of(&entries));

    if formatter.is_json() {
        formatter.json(&LsOutput {
            target: remote.to_string(),
            entries,
            summary,
        });
        return ExitCode::Success;
    }

    if !entries.is_empty() {
        formatter.println(&render_table(&entries, path, &formatter).to_string());
    }
    if let Some(summary) = summary {
        formatter.println(&format!(
            "\nTotal: {} files, {} directories, {}",
            summary.files, summary.directories, summary.total_size_human
        ));
    }
    ExitCode::Success
}

fn render_table(entries: &[Entry], base: &str, formatter: &Formatter) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING);

    for entry in entries {
        let name = display_name(entry, base);
        let (size, name) = if entry.is_dir {
            ("-".to_string(), formatter.dir_name(&name))
        } else {
            (entry.size_human(), name)
        };
        table.add_row(vec![
            Cell::new(super::format_time(entry.last_modified)),
            Cell::new(size).set_alignment(CellAlignment::Right),
            Cell::new(name),
        ]);
    }
    table
}

/// Name of an entry relative to the listed directory
fn display_name(entry: &Entry, base: &str) -> String {
    match entry.path.strip_prefix(base) {
        Some(rest) if !rest.is_empty() => rest.trim_start_matches('/').to_string(),
        _ => entry.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, is_dir: bool, size: i64) -> Entry {
        Entry {
            path: path.to_string(),
            key: path.trim_start_matches('/').to_string(),
            last_modified: None,
            etag: None,
            size,
            is_dir,
        }
    }

    #[test]
    fn test_display_name_relative_to_base() {
        assert_eq!(display_name(&entry("/docs/a.txt", false, 1), "/docs"), "a.txt");
        assert_eq!(display_name(&entry("/docs/sub/b", false, 1), "/docs"), "sub/b");
        assert_eq!(display_name(&entry("/top", true, 0), "/"), "top");
    }

    #[test]
    fn test_display_name_for_file_target() {
        assert_eq!(display_name(&entry("/docs/a.txt", false, 1), "/docs/a.txt"), "a.txt");
    }

    #[test]
    fn test_summary_counts() {
        let entries = vec![
            entry("/a", true, 0),
            entry("/b", false, 1024),
            entry("/c", false, 1024),
        ];
        let summary = Summary::of(&entries);
        assert_eq!(summary.files, 2);
        assert_eq!(summary.directories, 1);
        assert_eq!(summary.total_size_bytes, 2048);
        assert_eq!(summary.total_size_human, "2 KiB");
    }
}
