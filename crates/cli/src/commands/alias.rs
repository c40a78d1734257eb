//! Alias management commands
//!
//! An alias names an S3-compatible endpoint together with its credentials,
//! so targets can be written as `alias/bucket/path`.

use clap::Subcommand;
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};
use bucketfs_core::{Alias, AliasManager, BucketLookup, Error};

/// Alias subcommands for managing storage service connections
#[derive(Subcommand, Debug)]
pub enum AliasCommands {
    /// Add or update an alias
    Set(SetArgs),

    /// List all configured aliases
    List(ListArgs),

    /// Remove an alias
    Remove(RemoveArgs),
}

/// Arguments for the `alias set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Alias name (e.g., "local", "s3", "rustfs")
    pub name: String,

    /// S3 endpoint URL (e.g., "http://localhost:9000")
    pub endpoint: String,

    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// Region
    #[arg(long, default_value = "us-east-1")]
    pub region: String,

    /// Bucket lookup style: auto, path, or dns
    #[arg(long, default_value = "auto")]
    pub bucket_lookup: BucketLookup,
}

/// Arguments for the `alias list` command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show region and bucket lookup style
    #[arg(short, long)]
    pub long: bool,
}

/// Arguments for the `alias remove` command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Name of the alias to remove
    pub name: String,
}

/// JSON output for alias list
#[derive(Serialize)]
struct AliasListOutput {
    aliases: Vec<AliasInfo>,
}

/// Alias information for JSON output (without credentials)
#[derive(Serialize)]
struct AliasInfo {
    name: String,
    endpoint: String,
    region: String,
    bucket_lookup: String,
}

impl From<&Alias> for AliasInfo {
    fn from(alias: &Alias) -> Self {
        Self {
            name: alias.name.clone(),
            endpoint: alias.endpoint.clone(),
            region: alias.region.clone(),
            bucket_lookup: alias.bucket_lookup.to_string(),
        }
    }
}

/// JSON output for alias set/remove operations
#[derive(Serialize)]
struct AliasOperationOutput {
    success: bool,
    alias: String,
}

/// Execute an alias subcommand
pub async fn execute(cmd: AliasCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let manager = match AliasManager::new() {
        Ok(manager) => manager,
        Err(e) => return super::fail(&formatter, "Failed to load configuration", &e),
    };

    match cmd {
        AliasCommands::Set(args) => execute_set(args, &manager, &formatter),
        AliasCommands::List(args) => execute_list(args, &manager, &formatter),
        AliasCommands::Remove(args) => execute_remove(args, &manager, &formatter),
    }
}

/// Build an alias from `alias set` arguments
fn alias_from_args(args: &SetArgs) -> Result<Alias, String> {
    if args.name.is_empty() {
        return Err("Alias name cannot be empty".to_string());
    }
    if args.endpoint.is_empty() {
        return Err("Endpoint URL cannot be empty".to_string());
    }

    let mut alias = Alias::new(
        &args.name,
        &args.endpoint,
        &args.access_key,
        &args.secret_key,
    );
    alias.region = args.region.clone();
    alias.bucket_lookup = args.bucket_lookup;
    Ok(alias)
}

fn execute_set(args: SetArgs, manager: &AliasManager, formatter: &Formatter) -> ExitCode {
    let alias = match alias_from_args(&args) {
        Ok(alias) => alias,
        Err(msg) => {
            formatter.error(&msg);
            return ExitCode::UsageError;
        }
    };

    match manager.set(alias) {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&AliasOperationOutput {
                    success: true,
                    alias: args.name,
                });
            } else {
                formatter.success(&format!("Alias '{}' configured successfully.", args.name));
            }
            ExitCode::Success
        }
        Err(e) => super::fail(formatter, "Failed to save alias", &e),
    }
}

fn execute_list(args: ListArgs, manager: &AliasManager, formatter: &Formatter) -> ExitCode {
    let aliases = match manager.list() {
        Ok(aliases) => aliases,
        Err(e) => return super::fail(formatter, "Failed to list aliases", &e),
    };

    if formatter.is_json() {
        formatter.json(&AliasListOutput {
            aliases: aliases.iter().map(AliasInfo::from).collect(),
        });
    } else if aliases.is_empty() {
        formatter.println("No aliases configured.");
    } else {
        for alias in &aliases {
            if args.long {
                formatter.println(&format!(
                    "{:<12} {} (region: {}, lookup: {})",
                    alias.name, alias.endpoint, alias.region, alias.bucket_lookup
                ));
            } else {
                formatter.println(&format!("{:<12} {}", alias.name, alias.endpoint));
            }
        }
    }
    ExitCode::Success
}

fn execute_remove(args: RemoveArgs, manager: &AliasManager, formatter: &Formatter) -> ExitCode {
    match manager.remove(&args.name) {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&AliasOperationOutput {
                    success: true,
                    alias: args.name,
                });
            } else {
                formatter.success(&format!("Alias '{}' removed successfully.", args.name));
            }
            ExitCode::Success
        }
        Err(e @ Error::AliasNotFound(_)) => super::fail(formatter, "Cannot remove alias", &e),
        Err(e) => super::fail(formatter, "Failed to remove alias", &e),
    }
}
