//! File / directory / absent resolution
//!
//! Two HEAD probes run concurrently, one for the file key and one for the
//! directory marker. Both are awaited before deciding. A file wins over a
//! directory marker at the same path.

use tracing::warn;

use crate::backend::{Backend, RawObject};
use crate::encoding::{dir_marker_key, file_key};
use crate::entry::Entry;
use crate::error::Result;
use crate::namespace::Namespace;
use crate::path::{normalize, NormalizedPath};

impl<B: Backend> Namespace<B> {
    /// Resolve `path` to a file entry, a directory entry, or `None`.
    ///
    /// A probe that fails is treated as "not found" for that probe alone.
    /// The call only fails when both probes fail, since nothing can then be
    /// said about the path.
    pub async fn stat(&self, path: &str) -> Result<Option<Entry>> {
        let path = normalize(path)?;
        if path.is_root() {
            return Ok(Some(Entry::root()));
        }

        let file_key = file_key(&path);
        let marker_key = dir_marker_key(&path);
        let (file, marker) = tokio::join!(
            self.backend.head_object(&file_key),
            self.backend.head_object(&marker_key),
        );

        resolve(&path, file, marker)
    }
}

fn resolve(
    path: &NormalizedPath,
    file: Result<Option<RawObject>>,
    marker: Result<Option<RawObject>>,
) -> Result<Option<Entry>> {
    match (file, marker) {
        (Ok(Some(file)), marker) => {
            if matches!(marker, Ok(Some(_))) {
                warn!(path = %path, "file and directory marker both present, reporting the file");
            }
            Ok(Some(file_entry(path, file)))
        }
        (file, Ok(Some(marker))) => {
            if let Err(e) = file {
                warn!(path = %path, error = %e, "file probe failed");
            }
            Ok(Some(dir_entry(path, marker)))
        }
        (Err(file_err), Err(marker_err)) => {
            warn!(path = %path, error = %marker_err, "directory probe failed");
            Err(file_err.into_backend())
        }
        (file, marker) => {
            for e in [file.err(), marker.err()].into_iter().flatten() {
                warn!(path = %path, error = %e, "stat probe failed");
            }
            Ok(None)
        }
    }
}

fn file_entry(path: &NormalizedPath, object: RawObject) -> Entry {
    Entry {
        path: path.to_string(),
        key: object.key,
        last_modified: object.last_modified,
        etag: object.etag,
        size: object.size,
        is_dir: false,
    }
}

fn dir_entry(path: &NormalizedPath, object: RawObject) -> Entry {
    Entry {
        path: path.to_string(),
        key: object.key,
        last_modified: object.last_modified,
        etag: object.etag,
        size: 0,
        is_dir: true,
    }
}
