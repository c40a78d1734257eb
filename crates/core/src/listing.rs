//! Paginated prefix listing
//!
//! Pages are fetched strictly in sequence because each page's marker comes
//! from the previous page. Entries keep backend order; nothing is sorted,
//! deduplicated or cached between calls.

use tracing::debug;

use crate::backend::{Backend, ListPage, ListRequest, MAX_LIST_KEYS};
use crate::encoding::nested_prefix;
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::namespace::Namespace;
use crate::path::normalize;

impl<B: Backend> Namespace<B> {
    /// List every object whose key starts with `prefix`.
    ///
    /// `prefix` is a raw key prefix (no leading `/`). With a delimiter, keys
    /// below the next delimiter are grouped by the backend and not returned.
    /// A `max_keys` of 0 or above 1000 leaves the page size to the backend.
    pub async fn list(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
        max_keys: u32,
    ) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        let mut marker: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let request = ListRequest {
                prefix: prefix.to_string(),
                delimiter: delimiter.map(str::to_string),
                marker: marker.clone(),
                max_keys: page_size(max_keys),
            };
            let page = self.backend.list_page(&request).await?;
            pages += 1;
            debug!(
                prefix,
                page = pages,
                objects = page.objects.len(),
                truncated = page.truncated,
                "listed page"
            );

            let next = if page.truncated {
                next_marker(&page)
            } else {
                None
            };
            entries.extend(page.objects.into_iter().map(Entry::from_raw));

            if !page.truncated {
                break;
            }

            match next {
                Some(next) if marker.as_deref() != Some(next.as_str()) => marker = Some(next),
                Some(next) => {
                    return Err(Error::Backend(format!(
                        "listing of '{prefix}' did not advance past marker '{next}'"
                    )));
                }
                None => {
                    return Err(Error::Backend(format!(
                        "truncated listing of '{prefix}' carried no marker"
                    )));
                }
            }
        }

        Ok(entries)
    }

    /// List the contents of a directory.
    ///
    /// Without `recursive`, returns the files and sub-directories directly
    /// below `path`; with it, every nested file and directory marker.
    pub async fn list_dir(&self, path: &str, recursive: bool) -> Result<Vec<Entry>> {
        let path = normalize(path)?;
        let delimiter = if recursive { None } else { Some("/") };
        self.list(&nested_prefix(&path), delimiter, 0).await
    }
}

/// Page size passed to the backend, if any
fn page_size(max_keys: u32) -> Option<i32> {
    if max_keys == 0 || max_keys > MAX_LIST_KEYS {
        None
    } else {
        i32::try_from(max_keys).ok()
    }
}

/// Marker for the page after `page`.
///
/// Prefers the backend's NextMarker. Without one (typical when no delimiter
/// is used) the greatest key or common prefix of the page is used.
fn next_marker(page: &ListPage) -> Option<String> {
    if let Some(marker) = page.next_marker.as_ref().filter(|m| !m.is_empty()) {
        return Some(marker.clone());
    }
    let last_object = page.objects.last().map(|o| o.key.as_str());
    let last_prefix = page.common_prefixes.last().map(String::as_str);
    last_object.max(last_prefix).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RawObject;

    #[test]
    fn test_page_size_bounds() {
        assert_eq!(page_size(0), None);
        assert_eq!(page_size(1), Some(1));
        assert_eq!(page_size(1000), Some(1000));
        assert_eq!(page_size(1001), None);
    }

    #[test]
    fn test_next_marker_prefers_backend_marker() {
        let page = ListPage {
            objects: vec![RawObject::new("a", 1)],
            common_prefixes: vec![],
            truncated: true,
            next_marker: Some("b/".to_string()),
        };
        assert_eq!(next_marker(&page).as_deref(), Some("b/"));
    }

    #[test]
    fn test_next_marker_falls_back_to_last_key() {
        let page = ListPage {
            objects: vec![RawObject::new("a", 1), RawObject::new("c", 1)],
            common_prefixes: vec![],
            truncated: true,
            next_marker: None,
        };
        assert_eq!(next_marker(&page).as_deref(), Some("c"));
    }

    #[test]
    fn test_next_marker_considers_common_prefixes() {
        let page = ListPage {
            objects: vec![RawObject::new("a", 1)],
            common_prefixes: vec!["b/".to_string()],
            truncated: true,
            next_marker: Some(String::new()),
        };
        assert_eq!(next_marker(&page).as_deref(), Some("b/"));
    }

    #[test]
    fn test_next_marker_empty_page() {
        let page = ListPage {
            truncated: true,
            ..Default::default()
        };
        assert!(next_marker(&page).is_none());
    }
}
