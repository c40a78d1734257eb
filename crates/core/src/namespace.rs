//! The namespace service
//!
//! [`Namespace`] owns a [`Backend`] and exposes the filesystem operations.
//! The operations themselves live in `listing`, `stat`, `mkdir`, `put` and
//! `delete`; this module holds the service type, its options and the
//! existence probes they share.

use serde::{Deserialize, Serialize};

use crate::backend::{Backend, ListRequest, MAX_DELETE_BATCH};
use crate::encoding::{dir_marker_key, file_key};
use crate::error::{Error, Result};
use crate::path::NormalizedPath;

/// Tuning knobs for namespace operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceOptions {
    /// Keys per bulk-delete request (clamped to 1..=1000)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Bulk-delete requests kept in flight during a recursive delete
    #[serde(default = "default_delete_concurrency")]
    pub delete_concurrency: usize,
}

fn default_batch_size() -> usize {
    MAX_DELETE_BATCH
}

fn default_delete_concurrency() -> usize {
    1
}

impl Default for NamespaceOptions {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            delete_concurrency: default_delete_concurrency(),
        }
    }
}

impl NamespaceOptions {
    /// Batch size actually used, never above the protocol limit
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.clamp(1, MAX_DELETE_BATCH)
    }

    /// Concurrency actually used, at least one
    pub fn effective_concurrency(&self) -> usize {
        self.delete_concurrency.max(1)
    }
}

/// A hierarchical namespace emulated on top of a flat object store
pub struct Namespace<B> {
    pub(crate) backend: B,
    pub(crate) options: NamespaceOptions,
}

impl<B: Backend> Namespace<B> {
    /// Create a namespace with default options
    pub fn new(backend: B) -> Self {
        Self::with_options(backend, NamespaceOptions::default())
    }

    /// Create a namespace with explicit options
    pub fn with_options(backend: B, options: NamespaceOptions) -> Self {
        Self { backend, options }
    }

    /// The underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The options in effect
    pub fn options(&self) -> &NamespaceOptions {
        &self.options
    }

    /// Whether a file object exists at exactly `path`
    pub async fn file_exists(&self, path: &NormalizedPath) -> Result<bool> {
        if path.is_root() {
            return Ok(false);
        }
        self.key_exists(&file_key(path)).await
    }

    /// Whether a directory marker exists for `path` (the root always exists)
    pub async fn dir_exists(&self, path: &NormalizedPath) -> Result<bool> {
        if path.is_root() {
            return Ok(true);
        }
        self.key_exists(&dir_marker_key(path)).await
    }

    /// Single-page probe for an exact key.
    ///
    /// Lists with the key itself as prefix, `/` as delimiter and a page size
    /// of one. A key equal to the prefix sorts before every longer key sharing
    /// it, so the key exists iff it is the first object of that page.
    async fn key_exists(&self, key: &str) -> Result<bool> {
        let request = ListRequest {
            prefix: key.to_string(),
            delimiter: Some("/".to_string()),
            marker: None,
            max_keys: Some(1),
        };
        let page = self.backend.list_page(&request).await?;
        Ok(page.objects.first().is_some_and(|o| o.key == key))
    }

    /// Fail with `ParentMissing` unless the parent of `path` is a directory.
    ///
    /// The root always exists, so single-segment paths skip the probe.
    pub(crate) async fn require_parent(&self, path: &NormalizedPath) -> Result<()> {
        let Some(parent) = path.parent() else {
            return Ok(());
        };
        if parent.is_root() {
            return Ok(());
        }
        if !self.dir_exists(&parent).await.map_err(Error::into_backend)? {
            return Err(Error::ParentMissing(parent.to_string()));
        }
        Ok(())
    }
}
