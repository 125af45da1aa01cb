//! Filesystem object storage
//!
//! Objects are plain files under `{root}/{bucket}/{key}`; the same tree is
//! exposed read-only through the `/media` static file service.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

use crate::storage::{Bucket, ObjectStorage, StorageError};

pub struct FsStorage {
    root: PathBuf,
    public_base: String,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn object_path(&self, bucket: Bucket, key: &str) -> PathBuf {
        self.root.join(bucket.as_str()).join(key)
    }
}

#[async_trait]
impl ObjectStorage for FsStorage {
    async fn put(&self, bucket: Bucket, key: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let dir = self.root.join(bucket.as_str());
        fs::create_dir_all(&dir).await?;
        fs::write(dir.join(key), bytes).await?;
        Ok(format!("{}/media/{}/{}", self.public_base, bucket, key))
    }

    async fn delete(&self, bucket: Bucket, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.object_path(bucket, key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
