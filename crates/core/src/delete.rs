//! Deletion, including recursive directory removal
//!
//! Deleting a directory removes every key nested under it with the backend's
//! bulk-delete protocol, then removes the directory marker. There is no
//! rollback: a failed batch leaves the directory partially deleted, with its
//! marker still in place, and repeating the delete finishes the job.

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::backend::{Backend, KeyFailure, MAX_DELETE_BATCH};
use crate::encoding::{dir_marker_key, file_key, nested_prefix};
use crate::error::{Error, Result};
use crate::namespace::Namespace;
use crate::path::normalize_operand;
use crate::status::Status;

/// Keys removed and keys that could not be removed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteReport {
    /// Keys the backend acknowledged as deleted
    pub removed: Vec<String>,

    /// Keys the backend refused, with the reason
    pub failed: Vec<KeyFailure>,
}

impl DeleteReport {
    /// Whether every key was removed
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Status of the operation that produced this report
    pub fn status(&self) -> Status {
        if self.is_complete() {
            Status::NO_CONTENT
        } else {
            Status::INTERNAL_ERROR
        }
    }

    fn merge(&mut self, other: DeleteReport) {
        self.removed.extend(other.removed);
        self.failed.extend(other.failed);
    }
}

impl<B: Backend> Namespace<B> {
    /// Delete the file or directory at `path`.
    ///
    /// The file key is always deleted first; the backend accepts deletes of
    /// missing keys, so deleting a path that does not exist succeeds. If a
    /// directory marker exists, everything below the directory is purged in
    /// batches and the marker is removed last.
    pub async fn delete(&self, path: &str) -> Result<DeleteReport> {
        if path.is_empty() {
            return Err(Error::InvalidPath("Path cannot be empty".into()));
        }
        let path = normalize_operand(path)?;
        if path.is_root() {
            return Err(Error::Forbidden("cannot delete the root directory".into()));
        }

        let key = file_key(&path);
        self.backend
            .delete_object(&key)
            .await
            .map_err(Error::into_backend)?;
        let mut report = DeleteReport {
            removed: vec![key],
            failed: Vec::new(),
        };

        if !self.dir_exists(&path).await.map_err(Error::into_backend)? {
            debug!(path = %path, "no directory marker, delete complete");
            return Ok(report);
        }

        let nested: Vec<String> = self
            .list(&nested_prefix(&path), None, 0)
            .await
            .map_err(Error::into_backend)?
            .into_iter()
            .map(|entry| entry.key)
            .collect();
        debug!(path = %path, keys = nested.len(), "purging directory contents");

        report.merge(self.purge(nested).await);
        if !report.is_complete() {
            warn!(
                path = %path,
                failed = report.failed.len(),
                "directory partially deleted, marker kept"
            );
            return Err(Error::PartialDelete(report));
        }

        let marker = dir_marker_key(&path);
        self.backend
            .delete_object(&marker)
            .await
            .map_err(Error::into_backend)?;
        report.removed.push(marker);

        info!(path = %path, keys = report.removed.len(), "deleted directory");
        Ok(report)
    }

    /// Bulk-delete one batch of keys.
    ///
    /// Batches above the 1000-key protocol limit are refused without calling
    /// the backend; splitting is the caller's job.
    pub async fn delete_batch(&self, keys: &[String]) -> Result<DeleteReport> {
        if keys.len() > MAX_DELETE_BATCH {
            return Err(Error::BatchTooLarge(keys.len()));
        }
        if keys.is_empty() {
            return Ok(DeleteReport::default());
        }

        let outcome = self
            .backend
            .delete_objects(keys)
            .await
            .map_err(Error::into_backend)?;

        for failure in &outcome.failed {
            warn!(
                key = %failure.key,
                code = %failure.code,
                message = %failure.message,
                "bulk delete refused key"
            );
        }

        let removed = keys
            .iter()
            .filter(|key| !outcome.failed.iter().any(|f| &f.key == *key))
            .cloned()
            .collect();
        Ok(DeleteReport {
            removed,
            failed: outcome.failed,
        })
    }

    /// Delete `keys` in batches, accounting for each batch independently
    async fn purge(&self, keys: Vec<String>) -> DeleteReport {
        let batch_size = self.options.effective_batch_size();
        let concurrency = self.options.effective_concurrency();

        let results: Vec<(Vec<String>, Result<DeleteReport>)> =
            stream::iter(keys.chunks(batch_size).map(<[String]>::to_vec))
                .map(|batch| async move {
                    let result = self.delete_batch(&batch).await;
                    (batch, result)
                })
                .buffered(concurrency)
                .collect()
                .await;

        let mut report = DeleteReport::default();
        for (batch, result) in results {
            match result {
                Ok(batch_report) => report.merge(batch_report),
                Err(e) => {
                    warn!(keys = batch.len(), error = %e, "bulk delete request failed");
                    let message = e.to_string();
                    report.failed.extend(batch.into_iter().map(|key| KeyFailure {
                        key,
                        code: "RequestFailed".to_string(),
                        message: message.clone(),
                    }));
                }
            }
        }
        report
    }
}
