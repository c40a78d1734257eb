//! In-memory object store for namespace tests
//!
//! Emulates the listing contract of an S3 ListObjects (v1) call: keys in
//! lexicographic order, prefix filtering, delimiter grouping, marker-based
//! pagination and a 1000-key default page size. Every call is recorded and
//! individual failures can be injected.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use bucketfs_core::{
    Backend, BatchOutcome, Error, KeyFailure, ListPage, ListRequest, RawObject, Result, Status,
};

/// A backend call, as seen by the store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Call {
    List(ListRequest),
    Head(String),
    Put(String),
    Delete(String),
    DeleteBatch(Vec<String>),
}

#[derive(Default)]
struct State {
    objects: BTreeMap<String, RawObject>,
    calls: Vec<Call>,
    refused_keys: HashSet<String>,
    failing_heads: HashSet<String>,
    fail_batches: bool,
    put_status: Option<u16>,
    omit_next_marker: bool,
}

#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object directly, bypassing the namespace checks
    pub fn insert(&self, key: &str, size: i64) {
        let mut object = RawObject::new(key, size);
        object.etag = Some(format!("etag-{key}"));
        self.state
            .lock()
            .unwrap()
            .objects
            .insert(key.to_string(), object);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.lock().unwrap().objects.contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.state.lock().unwrap().objects.keys().cloned().collect()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn puts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Put(key) => Some(key),
                _ => None,
            })
            .collect()
    }

    pub fn batches(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::DeleteBatch(keys) => Some(keys),
                _ => None,
            })
            .collect()
    }

    pub fn list_calls(&self) -> Vec<ListRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::List(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    /// Make bulk deletes report `key` as refused
    pub fn refuse_key(&self, key: &str) {
        self.state
            .lock()
            .unwrap()
            .refused_keys
            .insert(key.to_string());
    }

    pub fn clear_refusals(&self) {
        self.state.lock().unwrap().refused_keys.clear();
    }

    /// Make HEAD requests for `key` fail at transport level
    pub fn fail_head(&self, key: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_heads
            .insert(key.to_string());
    }

    /// Make every bulk-delete request fail at transport level
    pub fn fail_batches(&self, fail: bool) {
        self.state.lock().unwrap().fail_batches = fail;
    }

    /// Make puts answer with a non-success status
    pub fn reject_puts(&self, status: u16) {
        self.state.lock().unwrap().put_status = Some(status);
    }

    /// Never send NextMarker, even with a delimiter
    pub fn omit_next_marker(&self) {
        self.state.lock().unwrap().omit_next_marker = true;
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn list_page(&self, request: &ListRequest) -> Result<ListPage> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::List(request.clone()));

        let limit = request.max_keys.map_or(1000, |m| m as usize);
        let marker = request.marker.clone().unwrap_or_default();
        let mut page = ListPage::default();
        let mut count = 0usize;
        let mut last = None;

        for (key, object) in state.objects.iter() {
            if !key.starts_with(&request.prefix) || key.as_str() <= marker.as_str() {
                continue;
            }

            let grouped = request.delimiter.as_deref().and_then(|delimiter| {
                key[request.prefix.len()..]
                    .find(delimiter)
                    .map(|idx| key[..request.prefix.len() + idx + delimiter.len()].to_string())
            });

            if let Some(common) = &grouped {
                if common.as_str() <= marker.as_str()
                    || page.common_prefixes.last() == Some(common)
                {
                    continue;
                }
            }

            if count == limit {
                page.truncated = true;
                break;
            }
            count += 1;

            match grouped {
                Some(common) => {
                    last = Some(common.clone());
                    page.common_prefixes.push(common);
                }
                None => {
                    last = Some(key.clone());
                    page.objects.push(object.clone());
                }
            }
        }

        if page.truncated && request.delimiter.is_some() && !state.omit_next_marker {
            page.next_marker = last;
        }
        Ok(page)
    }

    async fn head_object(&self, key: &str) -> Result<Option<RawObject>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Head(key.to_string()));
        if state.failing_heads.contains(key) {
            return Err(Error::Backend(format!("connection reset while probing {key}")));
        }
        Ok(state.objects.get(key).cloned())
    }

    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        _content_type: Option<String>,
    ) -> Result<Status> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Put(key.to_string()));
        if let Some(status) = state.put_status {
            return Err(Error::Rejected {
                status,
                message: "rejected by test backend".into(),
            });
        }
        let mut object = RawObject::new(key, body.len() as i64);
        object.etag = Some(format!("etag-{key}"));
        state.objects.insert(key.to_string(), object);
        Ok(Status::OK)
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Delete(key.to_string()));
        state.objects.remove(key);
        Ok(())
    }

    async fn delete_objects(&self, keys: &[String]) -> Result<BatchOutcome> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DeleteBatch(keys.to_vec()));
        assert!(keys.len() <= 1000, "bulk delete of {} keys", keys.len());
        if state.fail_batches {
            return Err(Error::Backend("bulk delete connection closed".into()));
        }

        let mut outcome = BatchOutcome::default();
        for key in keys {
            if state.refused_keys.contains(key) {
                outcome.failed.push(KeyFailure {
                    key: key.clone(),
                    code: "AccessDenied".into(),
                    message: "Access Denied".into(),
                });
            } else {
                state.objects.remove(key);
                outcome.deleted.push(key.clone());
            }
        }
        Ok(outcome)
    }
}
