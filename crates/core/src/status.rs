//! HTTP-style status codes reported by namespace operations

use serde::{Deserialize, Serialize};

/// Status of a namespace operation, using HTTP semantics.
///
/// Statuses produced locally are one of the associated constants; statuses
/// passed through from the backend may carry any code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(u16);

impl Status {
    pub const OK: Status = Status(200);
    pub const CREATED: Status = Status(201);
    pub const NO_CONTENT: Status = Status(204);
    pub const BAD_REQUEST: Status = Status(400);
    pub const FORBIDDEN: Status = Status(403);
    pub const METHOD_NOT_ALLOWED: Status = Status(405);
    pub const INTERNAL_ERROR: Status = Status(500);

    /// Wrap a raw status code
    pub const fn from_u16(code: u16) -> Self {
        Self(code)
    }

    /// Numeric value of the status
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Whether this is a 2xx status
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Canonical reason phrase, if known
    pub const fn reason(self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            409 => "Conflict",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ => "",
        }
    }
}

impl From<Status> for u16 {
    fn from(status: Status) -> Self {
        status.as_u16()
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reason() {
            "" => write!(f, "{}", self.0),
            reason => write!(f, "{} {reason}", self.0),
        }
    }
}
