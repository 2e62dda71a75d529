//! Durable key-value storage behind the daily ledger.
//!
//! The ledger only ever needs `get`/`set` on two keys, so every backend is a
//! plain string store. Values are JSON written by the ledger.

use async_trait::async_trait;

mod file;
mod memory;
mod postgres;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use postgres::PgStore;

pub const PROFILE_KEY: &str = "foodsnap_user";
pub const DAILY_LOG_KEY: &str = "foodsnap_daily_stats";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Returns only once the value is durable for this backend.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
