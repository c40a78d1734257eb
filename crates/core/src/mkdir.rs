//! Directory creation

use tracing::info;

use crate::backend::Backend;
use crate::encoding::dir_marker_key;
use crate::error::{Error, Result};
use crate::namespace::Namespace;
use crate::path::normalize_operand;
use crate::status::Status;

impl<B: Backend> Namespace<B> {
    /// Create a directory by writing its marker object.
    ///
    /// Fails with `NameCollision` when a file or a directory already exists at
    /// `path`, and with `ParentMissing` when the parent directory does not
    /// exist. Parents are never created implicitly.
    pub async fn mkdir(&self, path: &str) -> Result<Status> {
        let path = normalize_operand(path)?;
        if path.is_root() {
            return Err(Error::Forbidden("cannot create the root directory".into()));
        }

        if self.file_exists(&path).await.map_err(Error::into_backend)? {
            return Err(Error::NameCollision(format!("a file exists at {path}")));
        }
        if self.dir_exists(&path).await.map_err(Error::into_backend)? {
            return Err(Error::NameCollision(format!("a directory exists at {path}")));
        }
        self.require_parent(&path).await?;

        self.backend
            .put_object(&dir_marker_key(&path), Vec::new(), None)
            .await
            .map_err(Error::into_backend)?;

        info!(path = %path, "created directory");
        Ok(Status::CREATED)
    }
}
