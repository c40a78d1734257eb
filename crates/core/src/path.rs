//! Path normalization and target parsing
//!
//! Logical paths always start with `/`, never end with `/` (except the root
//! itself) and never contain empty segments. Every namespace operation works
//! on a [`NormalizedPath`], so malformed input is rejected before any backend
//! call is made.
//!
//! CLI targets have the format `alias/bucket[/path]`.

use crate::encoding::DIR_MARKER_SUFFIX;
use crate::error::{Error, Result};

/// A canonical logical path inside a bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath(String);

impl NormalizedPath {
    /// The root directory `/`
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Whether this is the root directory
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// The path as a string, including the leading `/`
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The object key for this path: the path without its leading `/`.
    ///
    /// The root maps to the empty key, which as a listing prefix selects
    /// the whole bucket.
    pub fn object_key(&self) -> &str {
        &self.0[1..]
    }

    /// Last path segment (empty for the root)
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// The parent directory.
    ///
    /// Returns `None` for the root, which has no parent. A single-segment path
    /// such as `/a` has the root as its parent.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) | None => Some(Self::root()),
            Some(pos) => Some(Self(self.0[..pos].to_string())),
        }
    }

    /// Append a single child segment
    pub fn join(&self, child: &str) -> Result<Self> {
        let child = child.trim_matches('/');
        if child.is_empty() {
            return Err(Error::InvalidPath("Child name cannot be empty".into()));
        }
        if self.is_root() {
            normalize(&format!("/{child}"))
        } else {
            normalize(&format!("{}/{child}", self.0))
        }
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalize a user-supplied path.
///
/// Rejects empty input, paths without a leading `/`, empty segments and
/// segments that end with the reserved directory-marker suffix. A single
/// trailing `/` is stripped unless the path is exactly `/`.
pub fn normalize(path: &str) -> Result<NormalizedPath> {
    if path.is_empty() {
        return Err(Error::InvalidPath("Path cannot be empty".into()));
    }
    if !path.starts_with('/') {
        return Err(Error::InvalidPath(format!("Path must start with /: '{path}'")));
    }
    if path == "/" {
        return Ok(NormalizedPath::root());
    }

    let trimmed = path.strip_suffix('/').unwrap_or(path);
    for segment in trimmed[1..].split('/') {
        if segment.is_empty() {
            return Err(Error::InvalidPath(format!(
                "Path contains an empty segment: '{path}'"
            )));
        }
        if segment.ends_with(DIR_MARKER_SUFFIX) {
            return Err(Error::InvalidPath(format!(
                "Path segment uses the reserved directory suffix: '{segment}'"
            )));
        }
    }

    Ok(NormalizedPath(trimmed.to_string()))
}

/// Canonicalize the operand of a mutation.
///
/// Same rules as [`normalize`], except that a bucket-relative path such as
/// `a.txt` is read as `/a.txt`.
pub(crate) fn normalize_operand(path: &str) -> Result<NormalizedPath> {
    if path.is_empty() || path.starts_with('/') {
        return normalize(path);
    }
    normalize(&format!("/{path}"))
}

/// A parsed CLI target pointing at a path inside an aliased bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePath {
    /// Alias name
    pub alias: String,
    /// Bucket name
    pub bucket: String,
    /// Logical path inside the bucket
    pub path: NormalizedPath,
}

impl RemotePath {
    /// Create a new RemotePath
    pub fn new(alias: impl Into<String>, bucket: impl Into<String>, path: NormalizedPath) -> Self {
        Self {
            alias: alias.into(),
            bucket: bucket.into(),
            path,
        }
    }
}

impl std::fmt::Display for RemotePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}{}", self.alias, self.bucket, self.path)
    }
}

/// Parse a target string of the form `alias/bucket[/path]`.
///
/// `alias/bucket` and `alias/bucket/` both address the root directory.
pub fn parse_target(target: &str) -> Result<RemotePath> {
    if target.is_empty() {
        return Err(Error::InvalidPath("Target cannot be empty".into()));
    }

    let parts: Vec<&str> = target.splitn(3, '/').collect();
    if parts.len() < 2 {
        return Err(Error::InvalidPath(format!(
            "Target '{target}' is incomplete. Use format: alias/bucket[/path]"
        )));
    }

    let alias = parts[0];
    let bucket = parts[1];

    if !is_valid_alias_name(alias) {
        return Err(Error::InvalidPath(format!("Invalid alias name: '{alias}'")));
    }
    if bucket.is_empty() {
        return Err(Error::InvalidPath("Bucket name cannot be empty".into()));
    }

    let path = match parts.get(2) {
        Some(rest) if !rest.is_empty() => normalize(&format!("/{rest}"))?,
        _ => NormalizedPath::root(),
    };

    Ok(RemotePath::new(alias, bucket, path))
}

/// Check if a string is a valid alias name
pub(crate) fn is_valid_alias_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_single_trailing_slash() {
        assert_eq!(normalize("/a/b/").unwrap().as_str(), "/a/b");
        assert_eq!(normalize("/a/b").unwrap().as_str(), "/a/b");
    }

    #[test]
    fn test_normalize_root() {
        let root = normalize("/").unwrap();
        assert!(root.is_root());
        assert_eq!(root.object_key(), "");
    }

    #[test]
    fn test_normalize_rejects_malformed() {
        assert!(matches!(normalize(""), Err(Error::InvalidPath(_))));
        assert!(matches!(normalize("a/b"), Err(Error::InvalidPath(_))));
        assert!(matches!(normalize("/a//b"), Err(Error::InvalidPath(_))));
        assert!(matches!(normalize("/a//"), Err(Error::InvalidPath(_))));
        assert!(matches!(normalize("//"), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_normalize_rejects_reserved_suffix() {
        let path = format!("/docs/x{DIR_MARKER_SUFFIX}");
        assert!(matches!(normalize(&path), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_normalize_operand_reads_relative_paths_from_root() {
        assert_eq!(normalize_operand("a.txt").unwrap().as_str(), "/a.txt");
        assert_eq!(normalize_operand("docs/").unwrap().as_str(), "/docs");
        assert_eq!(normalize_operand("/a/b").unwrap().as_str(), "/a/b");
        assert!(matches!(normalize_operand(""), Err(Error::InvalidPath(_))));
        assert!(matches!(normalize_operand("a//b"), Err(Error::InvalidPath(_))));
        // normalize itself stays strict
        assert!(matches!(normalize("a.txt"), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["/a", "/a/", "/a/b/c", "/a/b/c/", "/with space/f.txt", "/"] {
            let once = normalize(input).unwrap();
            let twice = normalize(once.as_str()).unwrap();
            assert_eq!(once, twice, "normalize not idempotent for {input}");
        }
    }

    #[test]
    fn test_parent() {
        let path = normalize("/a/b/c").unwrap();
        let parent = path.parent().unwrap();
        assert_eq!(parent.as_str(), "/a/b");

        let parent = parent.parent().unwrap();
        assert_eq!(parent.as_str(), "/a");

        let parent = parent.parent().unwrap();
        assert!(parent.is_root());

        assert!(parent.parent().is_none());
    }

    #[test]
    fn test_object_key_and_name() {
        let path = normalize("/docs/report.pdf").unwrap();
        assert_eq!(path.object_key(), "docs/report.pdf");
        assert_eq!(path.name(), "report.pdf");
        assert_eq!(NormalizedPath::root().name(), "");
    }

    #[test]
    fn test_join() {
        let root = NormalizedPath::root();
        let dir = root.join("docs").unwrap();
        assert_eq!(dir.as_str(), "/docs");
        assert_eq!(dir.join("a.txt").unwrap().as_str(), "/docs/a.txt");
        assert!(dir.join("").is_err());
    }

    #[test]
    fn test_parse_target_with_path() {
        let target = parse_target("minio/bucket/dir/file.txt").unwrap();
        assert_eq!(target.alias, "minio");
        assert_eq!(target.bucket, "bucket");
        assert_eq!(target.path.as_str(), "/dir/file.txt");
        assert_eq!(target.to_string(), "minio/bucket/dir/file.txt");
    }

    #[test]
    fn test_parse_target_bucket_only() {
        let target = parse_target("minio/bucket").unwrap();
        assert!(target.path.is_root());

        let target = parse_target("minio/bucket/").unwrap();
        assert!(target.path.is_root());
        assert_eq!(target.to_string(), "minio/bucket/");
    }

    #[test]
    fn test_parse_target_trailing_slash() {
        let target = parse_target("minio/bucket/dir/").unwrap();
        assert_eq!(target.path.as_str(), "/dir");
    }

    #[test]
    fn test_parse_target_invalid() {
        assert!(parse_target("").is_err());
        assert!(parse_target("minio").is_err());
        assert!(parse_target("minio/").is_err());
        assert!(parse_target("bad alias/bucket").is_err());
        assert!(parse_target("minio/bucket/a//b").is_err());
    }
}
