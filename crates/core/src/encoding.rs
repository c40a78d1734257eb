//! Directory-marker encoding
//!
//! A directory is an empty object whose key is the logical path plus
//! [`DIR_MARKER_SUFFIX`]; a file is an object whose key is the logical path.
//! Listing, stat, mkdir, put and delete all go through these functions so
//! that every component agrees on what a directory looks like.

use crate::path::NormalizedPath;

/// Reserved key suffix that marks an object as a directory
pub const DIR_MARKER_SUFFIX: &str = "-dir-e7588936-193f-4f63-9de4-ecaff18c5d8a";

/// Object key of the file at `path`
pub fn file_key(path: &NormalizedPath) -> String {
    path.object_key().to_string()
}

/// Object key of the directory marker for `path`
pub fn dir_marker_key(path: &NormalizedPath) -> String {
    format!("{}{DIR_MARKER_SUFFIX}", path.object_key())
}

/// Listing prefix selecting everything nested below `path`.
///
/// For the root this is the empty prefix (the whole bucket).
pub fn nested_prefix(path: &NormalizedPath) -> String {
    if path.is_root() {
        String::new()
    } else {
        format!("{}/", path.object_key())
    }
}

/// Decode a raw backend key into a logical path and a directory flag.
///
/// A missing leading `/` is added; a trailing marker suffix is stripped and
/// reported as a directory.
pub fn decode_key(key: &str) -> (String, bool) {
    let (stem, is_dir) = match key.strip_suffix(DIR_MARKER_SUFFIX) {
        Some(stem) => (stem, true),
        None => (key, false),
    };
    let path = if stem.starts_with('/') {
        stem.to_string()
    } else {
        format!("/{stem}")
    };
    (path, is_dir)
}
