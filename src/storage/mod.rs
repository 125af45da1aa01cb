//! Object storage for uploaded images
//!
//! Uploads land in one of two buckets and are served back under
//! `/media/{bucket}/{key}`. The filesystem backend is the production path,
//! the in-memory backend backs tests.

pub mod fs;
pub mod memory;

pub use fs::FsStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Upload destination. The bucket segment is part of every stored path and
/// public URL, so shop images and gallery images never collide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bucket {
    ProductImages,
    AlbumPhotos,
}

impl Bucket {
    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::ProductImages => "product-images",
            Bucket::AlbumPhotos => "album-photos",
        }
    }

    pub fn parse(s: &str) -> Option<Bucket> {
        match s {
            "product-images" => Some(Bucket::ProductImages),
            "album-photos" => Some(Bucket::AlbumPhotos),
            _ => None,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `bucket/key` and return the public URL the object
    /// is served from.
    async fn put(&self, bucket: Bucket, key: &str, bytes: &[u8]) -> Result<String, StorageError>;

    /// Remove an object. Deleting something that is already gone is a no-op.
    async fn delete(&self, bucket: Bucket, key: &str) -> Result<(), StorageError>;
}

/// Extract `(bucket, key)` from a public URL produced by
/// [`ObjectStorage::put`].
///
/// Foreign URLs (seeded data, external hosts) return `None`, which deletion
/// treats as nothing to clean up.
pub fn parse_public_url(url: &str) -> Option<(Bucket, String)> {
    let (_, path) = url.split_once("/media/")?;
    let (bucket, key) = path.split_once('/')?;
    let bucket = Bucket::parse(bucket)?;
    if key.is_empty() || key.contains('/') || key.contains("..") {
        return None;
    }
    Some((bucket, key.to_string()))
}
