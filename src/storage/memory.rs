//! In-memory object storage for tests

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::storage::{Bucket, ObjectStorage, StorageError};

#[derive(Default)]
pub struct MemoryStorage {
    objects: RwLock<HashMap<(Bucket, String), Vec<u8>>>,
    public_base: String,
}

impl MemoryStorage {
    pub fn new(public_base: impl Into<String>) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn contains(&self, bucket: Bucket, key: &str) -> bool {
        self.objects.read().contains_key(&(bucket, key.to_string()))
    }

    pub fn object_count(&self) -> usize {
        self.objects.read().len()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn put(&self, bucket: Bucket, key: &str, bytes: &[u8]) -> Result<String, StorageError> {
        self.objects
            .write()
            .insert((bucket, key.to_string()), bytes.to_vec());
        Ok(format!("{}/media/{}/{}", self.public_base, bucket, key))
    }

    async fn delete(&self, bucket: Bucket, key: &str) -> Result<(), StorageError> {
        self.objects.write().remove(&(bucket, key.to_string()));
        Ok(())
    }
}
