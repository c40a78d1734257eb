//! S3 backend implementation
//!
//! Wraps aws-sdk-s3 and implements the Backend trait from bucketfs-core.
//! The SDK signs every request and owns the HTTP transport.

use async_trait::async_trait;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use tracing::debug;

use bucketfs_core::backend::MAX_DELETE_BATCH;
use bucketfs_core::{
    Alias, Backend, BatchOutcome, Error, KeyFailure, ListPage, ListRequest, RawObject, Result,
    Status,
};

/// A single bucket on an S3-compatible service
pub struct S3Backend {
    inner: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Backend {
    /// Create a backend for `bucket` from an alias configuration
    pub async fn new(alias: &Alias, bucket: impl Into<String>) -> Result<Self> {
        url::Url::parse(&alias.endpoint)?;

        let credentials = aws_credential_types::Credentials::new(
            alias.access_key.clone(),
            alias.secret_key.clone(),
            None, // session token
            None, // expiry
            "bfs-static-credentials",
        );

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(alias.region.clone()))
            .endpoint_url(&alias.endpoint)
            .load()
            .await;

        // Path-style addressing for compatibility with non-AWS services
        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(alias.bucket_lookup.path_style())
            .build();

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: bucket.into(),
        })
    }

    /// Bucket this backend operates on
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }
}

#[async_trait]
impl Backend for S3Backend {
    async fn list_page(&self, request: &ListRequest) -> Result<ListPage> {
        let response = self
            .inner
            .list_objects()
            .bucket(&self.bucket)
            .prefix(&request.prefix)
            .set_delimiter(request.delimiter.clone())
            .set_marker(request.marker.clone())
            .set_max_keys(request.max_keys)
            .send()
            .await
            .map_err(classify)?;

        let objects = response
            .contents()
            .iter()
            .map(|object| {
                let key = object.key().ok_or_else(|| {
                    Error::Backend("listing returned an object without a key".into())
                })?;
                Ok(RawObject {
                    key: key.to_string(),
                    last_modified: object.last_modified().and_then(to_timestamp),
                    etag: object.e_tag().map(trim_etag),
                    size: object.size().unwrap_or(0),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let common_prefixes = response
            .common_prefixes()
            .iter()
            .filter_map(|p| p.prefix().map(str::to_string))
            .collect();

        let page = ListPage {
            objects,
            common_prefixes,
            truncated: response.is_truncated().unwrap_or(false),
            next_marker: response.next_marker().map(str::to_string),
        };
        debug!(
            bucket = %self.bucket,
            prefix = %request.prefix,
            objects = page.objects.len(),
            truncated = page.truncated,
            "ListObjects"
        );
        Ok(page)
    }

    async fn head_object(&self, key: &str) -> Result<Option<RawObject>> {
        let response = match self
            .inner
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(SdkError::ServiceError(service))
                if service.err().is_not_found() || service.raw().status().as_u16() == 404 =>
            {
                return Ok(None);
            }
            Err(e) => return Err(classify(e)),
        };

        Ok(Some(RawObject {
            key: key.to_string(),
            last_modified: response.last_modified().and_then(to_timestamp),
            etag: response.e_tag().map(trim_etag),
            size: response.content_length().unwrap_or(0),
        }))
    }

    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<Status> {
        let size = body.len();
        self.inner
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .set_content_type(content_type)
            .send()
            .await
            .map_err(classify)?;

        // The SDK only returns Ok for a 2xx answer and S3 answers a successful
        // PutObject with 200; any other status arrives as Error::Rejected.
        debug!(bucket = %self.bucket, key, size, "PutObject");
        Ok(Status::OK)
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(classify)?;

        debug!(bucket = %self.bucket, key, "DeleteObject");
        Ok(())
    }

    async fn delete_objects(&self, keys: &[String]) -> Result<BatchOutcome> {
        if keys.len() > MAX_DELETE_BATCH {
            return Err(Error::BatchTooLarge(keys.len()));
        }
        if keys.is_empty() {
            return Ok(BatchOutcome::default());
        }

        let objects = keys
            .iter()
            .map(|k| {
                ObjectIdentifier::builder()
                    .key(k)
                    .build()
                    .map_err(|e| Error::Backend(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .build()
            .map_err(|e| Error::Backend(e.to_string()))?;

        let response = self
            .inner
            .delete_objects()
            .bucket(&self.bucket)
            .delete(delete)
            .send()
            .await
            .map_err(classify)?;

        let deleted = response
            .deleted()
            .iter()
            .filter_map(|d| d.key().map(str::to_string))
            .collect();
        let errors = response
            .errors()
            .iter()
            .map(|e| BatchError {
                key: e.key().map(str::to_string),
                code: e.code().unwrap_or("Unknown").to_string(),
                message: e.message().unwrap_or_default().to_string(),
            })
            .collect();
        let outcome = batch_outcome(keys, deleted, errors);

        debug!(
            bucket = %self.bucket,
            requested = keys.len(),
            deleted = outcome.deleted.len(),
            failed = outcome.failed.len(),
            "DeleteObjects"
        );
        Ok(outcome)
    }
}

/// One entry of a DeleteObjects error list
struct BatchError {
    key: Option<String>,
    code: String,
    message: String,
}

/// Build the outcome of a bulk delete.
///
/// An error without a key cannot be attributed, so it is charged to every
/// requested key the response did not confirm as deleted.
fn batch_outcome(
    requested: &[String],
    deleted: Vec<String>,
    errors: Vec<BatchError>,
) -> BatchOutcome {
    let mut failed = Vec::new();
    let mut unattributed = None;
    for error in errors {
        match error.key {
            Some(key) => failed.push(KeyFailure {
                key,
                code: error.code,
                message: error.message,
            }),
            None => unattributed = Some((error.code, error.message)),
        }
    }

    if let Some((code, message)) = unattributed {
        let unconfirmed: Vec<KeyFailure> = requested
            .iter()
            .filter(|key| !deleted.contains(*key) && !failed.iter().any(|f| &f.key == *key))
            .map(|key| KeyFailure {
                key: key.clone(),
                code: code.clone(),
                message: message.clone(),
            })
            .collect();
        failed.extend(unconfirmed);
    }

    BatchOutcome { deleted, failed }
}

/// Map an SDK error onto the backend error convention
fn classify<E>(err: SdkError<E, HttpResponse>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    match &err {
        SdkError::ServiceError(service) => {
            let status = service.raw().status().as_u16();
            let code = service.err().code().unwrap_or("Unknown");
            let message = service.err().message().unwrap_or_default();
            Error::Rejected {
                status,
                message: format!("{code}: {message}"),
            }
        }
        _ => Error::Backend(DisplayErrorContext(&err).to_string()),
    }
}

fn to_timestamp(time: &aws_smithy_types::DateTime) -> Option<jiff::Timestamp> {
    jiff::Timestamp::new(time.secs(), time.subsec_nanos() as i32).ok()
}

fn trim_etag(etag: &str) -> String {
    etag.trim_matches('"').to_string()
}
