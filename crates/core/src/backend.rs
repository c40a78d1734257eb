//! Backend trait definition
//!
//! The backend is the flat key-value object store underneath the namespace.
//! It only understands keys, prefixes and delimiters; request signing and
//! transport live behind this trait. The S3 adapter implements it, and tests
//! substitute an in-memory store or a mock.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::status::Status;

/// Maximum number of keys one bulk-delete request may name
pub const MAX_DELETE_BATCH: usize = 1000;

/// Largest `max-keys` value passed through to a listing request
pub const MAX_LIST_KEYS: u32 = 1000;

/// A single raw object as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObject {
    /// Object key exactly as stored
    pub key: String,

    /// Last modification time
    pub last_modified: Option<jiff::Timestamp>,

    /// Entity tag, quotes stripped
    pub etag: Option<String>,

    /// Size in bytes
    pub size: i64,
}

impl RawObject {
    /// Create a RawObject with only a key and a size
    pub fn new(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            last_modified: None,
            etag: None,
            size,
        }
    }
}

/// Parameters of one listing round trip
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ListRequest {
    /// Key prefix (empty selects the whole bucket)
    pub prefix: String,

    /// Grouping delimiter, usually "/"
    pub delimiter: Option<String>,

    /// Pagination marker: list keys strictly after this one
    pub marker: Option<String>,

    /// Page size; `None` leaves the backend default in place
    pub max_keys: Option<i32>,
}

/// One page of a listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Objects in key order
    pub objects: Vec<RawObject>,

    /// Prefixes grouped by the delimiter
    pub common_prefixes: Vec<String>,

    /// Whether more results are available
    pub truncated: bool,

    /// Marker for the next page, usually only sent when a delimiter is used
    pub next_marker: Option<String>,
}

/// A key the backend refused to delete in a bulk-delete request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFailure {
    /// Object key
    pub key: String,

    /// Backend error code (e.g. "AccessDenied")
    pub code: String,

    /// Backend error message
    pub message: String,
}

/// Outcome of one bulk-delete request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Keys reported as deleted
    pub deleted: Vec<String>,

    /// Keys the backend could not delete
    pub failed: Vec<KeyFailure>,
}

/// Trait for flat object-store operations
///
/// Errors follow one convention: an HTTP-level refusal is
/// [`Error::Rejected`](crate::Error::Rejected) with the status code, anything
/// else (connection failure, unreadable body) is
/// [`Error::Backend`](crate::Error::Backend).
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch a single listing page
    async fn list_page(&self, request: &ListRequest) -> Result<ListPage>;

    /// Fetch object metadata; `Ok(None)` means the key does not exist
    async fn head_object(&self, key: &str) -> Result<Option<RawObject>>;

    /// Create or overwrite an object, returning the backend's status
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<Status>;

    /// Delete an object; succeeds whether or not the key existed
    async fn delete_object(&self, key: &str) -> Result<()>;

    /// Delete up to [`MAX_DELETE_BATCH`] keys in one request
    async fn delete_objects(&self, keys: &[String]) -> Result<BatchOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_object_new() {
        let object = RawObject::new("a/b.txt", 12);
        assert_eq!(object.key, "a/b.txt");
        assert_eq!(object.size, 12);
        assert!(object.etag.is_none());
        assert!(object.last_modified.is_none());
    }

    #[test]
    fn test_list_request_default() {
        let request = ListRequest::default();
        assert!(request.prefix.is_empty());
        assert!(request.delimiter.is_none());
        assert!(request.marker.is_none());
        assert!(request.max_keys.is_none());
    }
}
