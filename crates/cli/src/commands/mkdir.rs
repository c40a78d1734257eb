//! mkdir command - Create a directory
//!
//! Directories are created one level at a time; the parent must exist.

use clap::Args;
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Create a directory
#[derive(Args, Debug)]
pub struct MkdirArgs {
    /// Directory target (alias/bucket/path)
    pub target: String,
}

#[derive(Debug, Serialize)]
struct MkdirOutput {
    target: String,
    status: u16,
}

/// Execute the mkdir command
pub async fn execute(args: MkdirArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (remote, namespace) = match super::connect(&args.target).await {
        Ok(connected) => connected,
        Err(e) => return super::fail(&formatter, "Cannot open target", &e),
    };

    match namespace.mkdir(remote.path.as_str()).await {
        Ok(status) => {
            if formatter.is_json() {
                formatter.json(&MkdirOutput {
                    target: remote.to_string(),
                    status: status.as_u16(),
                });
            } else {
                formatter.success(&format!("Created directory `{remote}`."));
            }
            ExitCode::Success
        }
        Err(e) => super::fail(
            &formatter,
            &format!("Cannot create `{remote}` ({})", e.status()),
            &e,
        ),
    }
}
