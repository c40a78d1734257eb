//! rm command - Remove a file or a directory tree
//!
//! Removing a directory removes everything below it in bulk-delete batches,
//! then the directory itself. When some keys cannot be removed the
//! directory is kept, and the command can simply be run again.

use clap::Args;
use serde::Serialize;

use bucketfs_core::{DeleteReport, Error};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, Spinner};

/// Remove a file or a directory tree
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Target(s) to remove (alias/bucket/path)
    #[arg(required = true)]
    pub targets: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RmOutput {
    target: String,
    status: u16,
    #[serde(flatten)]
    report: DeleteReport,
}

/// Execute the rm command
pub async fn execute(args: RmArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let mut exit_code = ExitCode::Success;

    for target in &args.targets {
        let code = remove(target, &formatter).await;
        if exit_code == ExitCode::Success {
            exit_code = code;
        }
    }
    exit_code
}

async fn remove(target: &str, formatter: &Formatter) -> ExitCode {
    let (remote, namespace) = match super::connect(target).await {
        Ok(connected) => connected,
        Err(e) => return super::fail(formatter, "Cannot open target", &e),
    };

    let spinner = Spinner::start(formatter.config(), &format!("Removing {remote}"));
    let result = namespace.delete(remote.path.as_str()).await;
    spinner.finish();

    let (report, code) = match result {
        Ok(report) => (report, ExitCode::Success),
        Err(Error::PartialDelete(report)) => (report, ExitCode::GeneralError),
        Err(e) => return super::fail(formatter, &format!("Cannot remove `{remote}`"), &e),
    };

    if formatter.is_json() {
        formatter.json(&RmOutput {
            target: remote.to_string(),
            status: report.status().as_u16(),
            report,
        });
        return code;
    }

    for failure in &report.failed {
        formatter.warning(&format!(
            "{}: {} ({})",
            failure.key, failure.message, failure.code
        ));
    }
    if report.is_complete() {
        formatter.success(&format!(
            "Removed `{remote}` ({} object(s)).",
            report.removed.len()
        ));
    } else {
        formatter.error(&format!(
            "Removed {} object(s) under `{remote}`, {} failed; run again to retry.",
            report.removed.len(),
            report.failed.len()
        ));
    }
    code
}
