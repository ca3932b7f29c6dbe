//! Key-value persistence substrate
//!
//! The history store only needs a string-keyed store with get/set/remove.
//! [`RedbKv`] is the durable backend; [`MemoryKv`] keeps everything in
//! process for tests and throwaway sessions.

mod redb_kv;

pub use redb_kv::RedbKv;

use parking_lot::RwLock;
use shared::BillingError;
use std::collections::HashMap;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for BillingError {
    fn from(err: StorageError) -> Self {
        BillingError::storage(err.to_string())
    }
}

/// String key-value store, durable across restarts for real backends
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryKv {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one value (handy for decode tests)
    pub fn with_value(key: &str, value: &str) -> Self {
        let kv = Self::new();
        kv.data.write().insert(key.to_string(), value.to_string());
        kv
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.data.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.data.write().remove(key);
        Ok(())
    }
}
