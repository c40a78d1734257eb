//! CLI command definitions and execution
//!
//! Every namespace command addresses a target of the form
//! `alias/bucket[/path]` and runs one core operation against it.

use clap::{Parser, Subcommand};
use tracing::debug;

use bucketfs_core::{parse_target, AliasManager, Error, Namespace, RemotePath, Result};
use bucketfs_s3::S3Backend;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod alias;
mod completions;
mod ls;
mod mkdir;
mod put;
mod rm;
mod stat;

/// bfs - filesystem view over an S3-compatible bucket
///
/// Files and directories on top of a flat object store. Works with RustFS,
/// MinIO, AWS S3 and other S3-compatible backends.
#[derive(Parser, Debug)]
#[command(name = "bfs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress spinners
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage storage service aliases
    #[command(subcommand)]
    Alias(alias::AliasCommands),

    /// List a directory
    Ls(ls::LsArgs),

    /// Show file or directory metadata
    Stat(stat::StatArgs),

    /// Create a directory
    Mkdir(mkdir::MkdirArgs),

    /// Upload a local file
    Put(put::PutArgs),

    /// Remove a file or a directory tree
    Rm(rm::RmArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Alias(cmd) => alias::execute(cmd, output_config).await,
        Commands::Ls(args) => ls::execute(args, output_config).await,
        Commands::Stat(args) => stat::execute(args, output_config).await,
        Commands::Mkdir(args) => mkdir::execute(args, output_config).await,
        Commands::Put(args) => put::execute(args, output_config).await,
        Commands::Rm(args) => rm::execute(args, output_config).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

/// Resolve a target to its alias and bucket and open a namespace over it.
///
/// Namespace tuning (bulk-delete batch size and concurrency) comes from the
/// `[namespace]` table of the configuration file.
async fn connect(target: &str) -> Result<(RemotePath, Namespace<S3Backend>)> {
    let remote = parse_target(target)?;
    let manager = AliasManager::new()?;
    let alias = manager.get(&remote.alias)?;
    let options = manager.config_manager().load()?.namespace;

    debug!(
        alias = %remote.alias,
        endpoint = %alias.endpoint,
        bucket = %remote.bucket,
        "connecting"
    );
    let backend = S3Backend::new(&alias, &remote.bucket).await?;
    Ok((remote, Namespace::with_options(backend, options)))
}

/// Report an error and map it to an exit code
fn fail(formatter: &Formatter, context: &str, err: &Error) -> ExitCode {
    formatter.error(&format!("{context}: {err}"));
    ExitCode::from(err)
}

/// Format an optional timestamp for human output
fn format_time(time: Option<jiff::Timestamp>) -> String {
    time.map(|t| t.strftime("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["bfs", "ls", "local/bucket", "--json", "-q"]).unwrap();
        assert!(cli.json);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Ls(_)));
    }

    #[test]
    fn test_bucket_lookup_is_checked_by_the_parser() {
        let parsed = Cli::try_parse_from([
            "bfs", "alias", "set", "local", "http://localhost:9000", "ak", "sk",
            "--bucket-lookup", "dns",
        ]);
        assert!(parsed.is_ok());

        let parsed = Cli::try_parse_from([
            "bfs", "alias", "set", "local", "http://localhost:9000", "ak", "sk",
            "--bucket-lookup", "virtual",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(None), "");
        let ts = jiff::Timestamp::from_second(0).unwrap();
        assert_eq!(format_time(Some(ts)), "1970-01-01 00:00:00");
    }
}
