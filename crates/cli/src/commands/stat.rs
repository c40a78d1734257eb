//! stat command - Show file or directory metadata

use clap::Args;
use serde::Serialize;

use bucketfs_core::Entry;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Show file or directory metadata
#[derive(Args, Debug)]
pub struct StatArgs {
    /// Target (alias/bucket/path)
    pub target: String,
}

#[derive(Debug, Serialize)]
struct StatOutput {
    target: String,
    #[serde(flatten)]
    entry: Entry,
    size_human: String,
}

/// Execute the stat command
pub async fn execute(args: StatArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (remote, namespace) = match super::connect(&args.target).await {
        Ok(connected) => connected,
        Err(e) => return super::fail(&formatter, "Cannot open target", &e),
    };

    let entry = match namespace.stat(remote.path.as_str()).await {
        Ok(Some(entry)) => entry,
        Ok(None) => {
            formatter.error(&format!("No such file or directory: {remote}"));
            return ExitCode::NotFound;
        }
        Err(e) => return super::fail(&formatter, "Failed to stat target", &e),
    };

    if formatter.is_json() {
        let size_human = entry.size_human();
        formatter.json(&StatOutput {
            target: remote.to_string(),
            entry,
            size_human,
        });
        return ExitCode::Success;
    }

    formatter.println(&format!("Path      : {}", entry.path));
    formatter.println(&format!(
        "Type      : {}",
        if entry.is_dir { "directory" } else { "file" }
    ));
    formatter.println(&format!("Key       : {}", entry.key));
    if entry.last_modified.is_some() {
        formatter.println(&format!(
            "Date      : {}",
            super::format_time(entry.last_modified)
        ));
    }
    if !entry.is_dir {
        formatter.println(&format!(
            "Size      : {} ({} bytes)",
            entry.size_human(),
            entry.size
        ));
    }
    if let Some(etag) = &entry.etag {
        formatter.println(&format!("ETag      : {etag}"));
    }
    ExitCode::Success
}
