//! The filesystem node surfaced to callers

use serde::{Deserialize, Serialize};

use crate::backend::RawObject;
use crate::encoding::decode_key;
use crate::path::NormalizedPath;

/// One file or directory in the emulated namespace.
///
/// Entries are read-only projections built fresh by every listing or stat
/// call; nothing caches them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Logical path (leading `/`, no trailing `/`, marker suffix stripped)
    pub path: String,

    /// Backend object key this entry was decoded from
    pub key: String,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<jiff::Timestamp>,

    /// ETag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Size in bytes (always 0 for directories)
    pub size: i64,

    /// Whether the key carried the directory marker suffix
    pub is_dir: bool,
}

impl Entry {
    /// Decode a raw backend object
    pub fn from_raw(object: RawObject) -> Self {
        let (path, is_dir) = decode_key(&object.key);
        Self {
            path,
            key: object.key,
            last_modified: object.last_modified,
            etag: object.etag,
            size: if is_dir { 0 } else { object.size },
            is_dir,
        }
    }

    /// The root directory, which always exists
    pub fn root() -> Self {
        Self {
            path: NormalizedPath::root().to_string(),
            key: String::new(),
            last_modified: None,
            etag: None,
            size: 0,
            is_dir: true,
        }
    }

    /// Human-readable size
    pub fn size_human(&self) -> String {
        humansize::format_size(self.size.max(0) as u64, humansize::BINARY)
    }

    /// Last path segment
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }
}
