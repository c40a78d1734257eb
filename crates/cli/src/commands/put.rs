//! put command - Upload a local file
//!
//! The whole file is sent in a single request. When the target names an
//! existing directory, or ends with `/`, the local file name is appended.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use bucketfs_core::{Backend, Error, Namespace, NormalizedPath, RemotePath, Result};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, Spinner};

/// Upload a local file
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Local file to upload
    pub source: PathBuf,

    /// Destination (alias/bucket/path or alias/bucket/dir/)
    pub target: String,

    /// Content type (guessed from the file extension by default)
    #[arg(long)]
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutOutput {
    source: String,
    target: String,
    size_bytes: usize,
    content_type: Option<String>,
    status: u16,
}

/// Execute the put command
pub async fn execute(args: PutArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let content = match tokio::fs::read(&args.source).await {
        Ok(content) => content,
        Err(e) => {
            formatter.error(&format!(
                "Cannot read '{}': {e}",
                args.source.display()
            ));
            return if e.kind() == std::io::ErrorKind::NotFound {
                ExitCode::NotFound
            } else {
                ExitCode::GeneralError
            };
        }
    };

    let (remote, namespace) = match super::connect(&args.target).await {
        Ok(connected) => connected,
        Err(e) => return super::fail(&formatter, "Cannot open target", &e),
    };

    let remote = match upload_destination(&namespace, remote, &args.target, &args.source).await {
        Ok(remote) => remote,
        Err(e) => return super::fail(&formatter, "Cannot resolve destination", &e),
    };

    let content_type = args.content_type.or_else(|| guess_content_type(&args.source));
    let size = content.len();

    let spinner = Spinner::start(
        formatter.config(),
        &format!("Uploading {} to {remote}", args.source.display()),
    );
    let result = namespace
        .put(remote.path.as_str(), content, content_type.as_deref())
        .await;
    spinner.finish();

    match result {
        Ok(status) => {
            if formatter.is_json() {
                formatter.json(&PutOutput {
                    source: args.source.display().to_string(),
                    target: remote.to_string(),
                    size_bytes: size,
                    content_type,
                    status: status.as_u16(),
                });
            } else {
                formatter.success(&format!(
                    "{} -> {remote} ({})",
                    args.source.display(),
                    humansize::format_size(size as u64, humansize::BINARY)
                ));
            }
            ExitCode::Success
        }
        Err(e) => super::fail(
            &formatter,
            &format!("Upload to `{remote}` failed ({})", e.status()),
            &e,
        ),
    }
}

/// Where an upload lands.
///
/// The root, a target ending in `/` and an existing directory all receive
/// the file under its local name. A failed directory lookup is an error.
async fn upload_destination<B: Backend>(
    namespace: &Namespace<B>,
    mut remote: RemotePath,
    target: &str,
    source: &Path,
) -> Result<RemotePath> {
    let into_dir = remote.path.is_root()
        || target.ends_with('/')
        || namespace.dir_exists(&remote.path).await?;
    if into_dir {
        remote.path = destination(&remote.path, source)?;
    }
    Ok(remote)
}

/// Path of `source` placed inside directory `dir`
fn destination(dir: &NormalizedPath, source: &Path) -> Result<NormalizedPath> {
    let name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidPath(format!("'{}' has no file name", source.display())))?;
    dir.join(name)
}

fn guess_content_type(source: &Path) -> Option<String> {
    mime_guess::from_path(source)
        .first()
        .map(|mime| mime.essence_str().to_string())
}
