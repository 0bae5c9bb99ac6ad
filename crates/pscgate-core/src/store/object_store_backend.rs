//! Object store implementation of BlobStore.
//!
//! Supports S3, Azure Blob, and local filesystem via the `object_store`
//! crate, plus an in-memory backend for tests.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::path::Path;
use object_store::{ObjectStore, ObjectStoreExt, PutPayload};

use super::{BlobMeta, BlobStore, StoreError, StoreResult, StoreSpec};

/// Blob store backed by `object_store`.
pub struct ObjectStoreBlobStore {
    inner: Arc<dyn ObjectStore>,
}

impl ObjectStoreBlobStore {
    /// Create a store from a parsed spec.
    pub fn from_spec(spec: &StoreSpec) -> StoreResult<Self> {
        let inner: Arc<dyn ObjectStore> = match spec.scheme.as_str() {
            "memory" => Arc::new(object_store::memory::InMemory::new()),
            "file" => {
                let path = if let Some(bucket) = &spec.bucket {
                    format!("/{}/{}", bucket, spec.prefix)
                } else {
                    format!("/{}", spec.prefix)
                };
                std::fs::create_dir_all(&path).map_err(|e| StoreError::Io {
                    message: format!("failed to create store directory {}: {}", path, e),
                })?;
                Arc::new(
                    object_store::local::LocalFileSystem::new_with_prefix(&path).map_err(|e| {
                        StoreError::Io {
                            message: format!("failed to create local store at {}: {}", path, e),
                        }
                    })?,
                )
            }
            "s3" => {
                let bucket = spec
                    .bucket
                    .as_ref()
                    .ok_or_else(|| StoreError::InvalidSpec {
                        spec: format!("s3://{:?}/{}", spec.bucket, spec.prefix),
                        reason: "S3 URL must include bucket name".to_string(),
                    })?;

                let mut builder = object_store::aws::AmazonS3Builder::from_env()
                    .with_bucket_name(bucket)
                    .with_allow_http(false);

                if let Some(region) = &spec.region {
                    builder = builder.with_region(region);
                }

                Arc::new(builder.build().map_err(|e| StoreError::Io {
                    message: format!("failed to create S3 client: {}", e),
                })?)
            }
            "az" => {
                let container = spec
                    .bucket
                    .as_ref()
                    .ok_or_else(|| StoreError::InvalidSpec {
                        spec: format!("az://{:?}/{}", spec.bucket, spec.prefix),
                        reason: "Azure URL must include container name".to_string(),
                    })?;

                let builder = object_store::azure::MicrosoftAzureBuilder::from_env()
                    .with_container_name(container);

                Arc::new(builder.build().map_err(|e| StoreError::Io {
                    message: format!("failed to create Azure client: {}", e),
                })?)
            }
            scheme => {
                return Err(StoreError::InvalidSpec {
                    spec: spec.scheme.clone(),
                    reason: format!("unsupported scheme: {}", scheme),
                })
            }
        };

        Ok(Self { inner })
    }

    /// Create a store from a URL string.
    pub fn from_url(url: &str) -> StoreResult<Self> {
        let spec = StoreSpec::parse(url)?;
        Self::from_spec(&spec)
    }

    /// Create an in-memory store for testing.
    pub fn memory() -> Self {
        Self {
            inner: Arc::new(object_store::memory::InMemory::new()),
        }
    }
}

#[async_trait]
impl BlobStore for ObjectStoreBlobStore {
    async fn get(&self, key: &Path) -> StoreResult<Bytes> {
        let result = self
            .inner
            .get(key)
            .await
            .map_err(|e| StoreError::from_object_store(e, key.as_ref()))?;

        result.bytes().await.map_err(|e| StoreError::Io {
            message: format!("failed to read object bytes: {}", e),
        })
    }

    async fn put(&self, key: &Path, bytes: Bytes) -> StoreResult<()> {
        self.inner
            .put(key, PutPayload::from_bytes(bytes))
            .await
            .map_err(|e| StoreError::from_object_store(e, key.as_ref()))?;
        Ok(())
    }

    async fn delete(&self, key: &Path) -> StoreResult<bool> {
        match self.inner.delete(key).await {
            Ok(()) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(StoreError::from_object_store(e, key.as_ref())),
        }
    }

    async fn list(&self, prefix: &Path) -> StoreResult<Vec<BlobMeta>> {
        let list = self.inner.list(Some(prefix));
        let entries: Vec<_> = list.try_collect().await.map_err(|e| StoreError::Io {
            message: format!("failed to list objects: {}", e),
        })?;

        Ok(entries
            .iter()
            .map(|entry| BlobMeta {
                key: entry.location.as_ref().to_string(),
                size: entry.size,
            })
            .collect())
    }
}
