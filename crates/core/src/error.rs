//! Error types for bucketfs-core
//!
//! Provides a unified error type that maps onto both HTTP-style statuses
//! (for namespace operations) and CLI exit codes.

use thiserror::Error;

use crate::delete::DeleteReport;
use crate::status::Status;

/// Result type alias for bucketfs-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bucketfs-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed path, rejected before anything reaches the backend
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Operation not permitted on this path (e.g. the root directory)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A file and a directory would share the same logical path
    #[error("Name collision: {0}")]
    NameCollision(String),

    /// Directories must be created top-down
    #[error("Parent directory does not exist: {0}")]
    ParentMissing(String),

    /// Backend answered with a non-success HTTP status
    #[error("Backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Transport failure or malformed backend response
    #[error("Backend error: {0}")]
    Backend(String),

    /// A bulk-delete request named more keys than the protocol allows
    #[error("Bulk delete batch of {0} keys exceeds the limit of 1000")]
    BatchTooLarge(usize),

    /// Recursive delete removed some keys but not all
    #[error("Delete incomplete: {} key(s) removed, {} key(s) failed", .0.removed.len(), .0.failed.len())]
    PartialDelete(DeleteReport),

    /// Alias not found
    #[error("Alias not found: {0}")]
    AliasNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// HTTP-style status for this error
    pub fn status(&self) -> Status {
        match self {
            Error::InvalidPath(_) => Status::BAD_REQUEST,
            Error::Forbidden(_) => Status::FORBIDDEN,
            Error::NameCollision(_) | Error::ParentMissing(_) => Status::METHOD_NOT_ALLOWED,
            Error::Rejected { status, .. } => Status::from_u16(*status),
            _ => Status::INTERNAL_ERROR,
        }
    }

    /// Collapse an HTTP-level rejection into a generic backend failure.
    ///
    /// Mkdir and Delete report every backend problem as an internal error;
    /// only Put passes the backend status through.
    pub fn into_backend(self) -> Self {
        match self {
            Error::Rejected { status, message } => {
                Error::Backend(format!("status {status}: {message}"))
            }
            other => other,
        }
    }

    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_) | Error::Config(_) | Error::InvalidUrl(_) => 2, // UsageError
            Error::Backend(_) => 3,                                             // NetworkError
            Error::Forbidden(_) => 4,                                           // AuthError
            Error::AliasNotFound(_) => 5,                                       // NotFound
            Error::NameCollision(_) | Error::ParentMissing(_) => 6,             // Conflict
            Error::Rejected { status, .. } => match *status {
                401 | 403 => 4,
                404 => 5,
                409 | 412 => 6,
                _ => 3,
            },
            _ => 1, // GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::InvalidPath("test".into()).exit_code(), 2);
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::Backend("test".into()).exit_code(), 3);
        assert_eq!(Error::Forbidden("test".into()).exit_code(), 4);
        assert_eq!(Error::AliasNotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::NameCollision("test".into()).exit_code(), 6);
        assert_eq!(Error::ParentMissing("test".into()).exit_code(), 6);
        assert_eq!(Error::BatchTooLarge(1001).exit_code(), 1);
        assert_eq!(
            Error::Rejected {
                status: 403,
                message: "AccessDenied".into()
            }
            .exit_code(),
            4
        );
    }

    #[test]
    fn test_error_status() {
        assert_eq!(Error::InvalidPath("x".into()).status(), Status::BAD_REQUEST);
        assert_eq!(Error::Forbidden("/".into()).status(), Status::FORBIDDEN);
        assert_eq!(
            Error::NameCollision("/a".into()).status(),
            Status::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            Error::ParentMissing("/a".into()).status(),
            Status::METHOD_NOT_ALLOWED
        );
        assert_eq!(Error::Backend("boom".into()).status(), Status::INTERNAL_ERROR);
        assert_eq!(
            Error::PartialDelete(DeleteReport::default()).status(),
            Status::INTERNAL_ERROR
        );
    }

    #[test]
    fn test_rejected_status_passes_through() {
        let err = Error::Rejected {
            status: 507,
            message: "InsufficientStorage".into(),
        };
        assert_eq!(err.status().as_u16(), 507);

        let collapsed = err.into_backend();
        assert!(matches!(collapsed, Error::Backend(_)));
        assert_eq!(collapsed.status(), Status::INTERNAL_ERROR);
    }

    #[test]
    fn test_error_display() {
        let err = Error::AliasNotFound("minio".into());
        assert_eq!(err.to_string(), "Alias not found: minio");

        let err = Error::InvalidPath("/bad//path".into());
        assert_eq!(err.to_string(), "Invalid path: /bad//path");
    }
}
