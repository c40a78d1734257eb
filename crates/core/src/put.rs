//! File writes

use tracing::info;

use crate::backend::Backend;
use crate::encoding::file_key;
use crate::error::{Error, Result};
use crate::namespace::Namespace;
use crate::path::normalize_operand;
use crate::status::Status;

impl<B: Backend> Namespace<B> {
    /// Write a file, overwriting any existing file at `path`.
    ///
    /// Fails with `NameCollision` when a directory exists at `path` and with
    /// `ParentMissing` when the parent directory does not exist. The backend's
    /// status is returned as is, including refusals (`Error::Rejected`).
    pub async fn put(
        &self,
        path: &str,
        content: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<Status> {
        if path.is_empty() || path == "/" {
            return Err(Error::InvalidPath(format!(
                "cannot write a file at '{path}'"
            )));
        }
        let path = normalize_operand(path)?;

        if self.dir_exists(&path).await.map_err(Error::into_backend)? {
            return Err(Error::NameCollision(format!("a directory exists at {path}")));
        }
        self.require_parent(&path).await?;

        let size = content.len();
        let status = self
            .backend
            .put_object(&file_key(&path), content, content_type.map(str::to_string))
            .await?;

        info!(path = %path, size, status = status.as_u16(), "wrote file");
        Ok(status)
    }
}
