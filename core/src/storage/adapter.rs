//! Persistence adapter trait
//!
//! Defines the key-value contract the stores persist through.

use async_trait::async_trait;

use crate::Result;

/// Key-value durability boundary
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    /// Read the value stored under `key`, `None` if nothing was saved yet
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    async fn save(&self, key: &str, value: &str) -> Result<()>;
}
