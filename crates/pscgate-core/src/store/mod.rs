//! Blob-store collaborator for archive intake and promotion.
//!
//! A thin adapter over object storage: download the arriving archive, upload
//! promoted or routed entries, delete the source. No platform, no DB — just
//! object storage plus the key conventions in [`crate::paths`].
//!
//! The pipeline only sees the [`BlobStore`] trait, so every test can run
//! against the in-memory backend.

pub mod error;
pub mod object_store_backend;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::path::Path;

pub use error::{StoreError, StoreResult};
pub use object_store_backend::ObjectStoreBlobStore;

/// Parsed store specification from CLI/config.
///
/// # Examples
///
/// ```text
/// s3://my-bucket?region=eu-west-1
/// az://invoicing
/// file:///var/lib/pscgate
/// memory://  (for testing)
/// ```
#[derive(Debug, Clone)]
pub struct StoreSpec {
    /// The scheme (s3, az, file, memory)
    pub scheme: String,
    /// Bucket or container name (empty for file://)
    pub bucket: Option<String>,
    /// Base prefix/path within the bucket
    pub prefix: String,
    /// Optional region (for S3)
    pub region: Option<String>,
}

impl StoreSpec {
    /// Parse a store URL like `s3://bucket/prefix` or `file:///path`.
    pub fn parse(url: &str) -> StoreResult<Self> {
        let url = url::Url::parse(url).map_err(|e| StoreError::InvalidSpec {
            spec: url.to_string(),
            reason: e.to_string(),
        })?;

        let scheme = url.scheme().to_string();
        let bucket = url.host_str().map(|s| s.to_string());
        let prefix = url.path().trim_start_matches('/').to_string();

        let region = url
            .query_pairs()
            .find(|(k, _)| k == "region")
            .map(|(_, v)| v.to_string());

        Ok(Self {
            scheme,
            bucket,
            prefix,
            region,
        })
    }

    /// Check if this is a memory store (for testing).
    pub fn is_memory(&self) -> bool {
        self.scheme == "memory"
    }
}

/// Metadata for one listed object.
#[derive(Debug, Clone)]
pub struct BlobMeta {
    /// Full key of the object.
    pub key: String,
    /// Size in bytes.
    pub size: u64,
}

/// The blob-store operations the pipeline consumes.
///
/// All operations are async for compatibility with object stores. Keys are
/// container-relative paths built by [`crate::paths`].
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Download an object's full content.
    ///
    /// Returns `Err(StoreError::NotFound)` when the key is absent.
    async fn get(&self, key: &Path) -> StoreResult<Bytes>;

    /// Upload an object, overwriting any previous content at the key.
    async fn put(&self, key: &Path, bytes: Bytes) -> StoreResult<()>;

    /// Delete an object. Returns `false` when the key was already absent,
    /// mirroring a delete-if-exists.
    async fn delete(&self, key: &Path) -> StoreResult<bool>;

    /// List objects under a prefix.
    async fn list(&self, prefix: &Path) -> StoreResult<Vec<BlobMeta>>;
}
