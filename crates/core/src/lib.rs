//! bucketfs-core: a filesystem namespace over flat object stores
//!
//! Object stores only know keys, prefixes and delimiters. This crate layers
//! folders, files, stat and recursive delete on top of them:
//! - Path normalization ([`path`])
//! - Directory-marker encoding ([`encoding`])
//! - Paginated listing, stat, mkdir, put and delete on [`Namespace`]
//! - The [`Backend`] trait the storage adapter implements
//! - Configuration and alias management for the CLI
//!
//! This crate does not depend on any S3 SDK, so it can be tested against an
//! in-memory backend.

pub mod alias;
pub mod backend;
pub mod config;
pub mod delete;
pub mod encoding;
pub mod entry;
pub mod error;
mod listing;
mod mkdir;
pub mod namespace;
pub mod path;
mod put;
mod stat;
pub mod status;

pub use alias::{Alias, AliasManager, BucketLookup};
pub use backend::{Backend, BatchOutcome, KeyFailure, ListPage, ListRequest, RawObject};
pub use config::{Config, ConfigManager};
pub use delete::DeleteReport;
pub use encoding::DIR_MARKER_SUFFIX;
pub use entry::Entry;
pub use error::{Error, Result};
pub use namespace::{Namespace, NamespaceOptions};
pub use path::{normalize, parse_target, NormalizedPath, RemotePath};
pub use status::Status;
