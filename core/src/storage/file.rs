//! File-based key-value storage
//!
//! Stores every key as its own file under a root directory.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::adapter::PersistenceAdapter;
use crate::{Error, Result};

/// File-backed key-value store
pub struct FileStorage {
    /// Directory holding one file per key
    root: PathBuf,
}

impl FileStorage {
    /// Create a new FileStorage rooted at `root`
    ///
    /// The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(encode_key(key))
    }

    /// Scratch file used while replacing `key`
    ///
    /// Encoded names never start with `.`, so this cannot shadow a key.
    fn tmp_path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!(".{}.tmp", encode_key(key)))
    }
}

/// Map a key to a file name, one-to-one
///
/// `[A-Za-z0-9_-]` is kept, every other byte becomes `%XX`. The empty key
/// gets the name `%`, which no other key encodes to.
fn encode_key(key: &str) -> String {
    if key.is_empty() {
        return "%".to_string();
    }

    let mut name = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            name.push(byte as char);
        } else {
            name.push_str(&format!("%{:02X}", byte));
        }
    }
    name
}

#[async_trait]
impl PersistenceAdapter for FileStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                err
            ))),
        }
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Error::Storage(format!("Failed to create directory: {}", e)))?;

        // Write next to the target, then swap it in
        let tmp_path = self.tmp_path_for(key);
        let written = match tokio::fs::write(&tmp_path, value).await {
            Ok(()) => tokio::fs::rename(&tmp_path, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(Error::Storage(format!(
                "Failed to write {}: {}",
                path.display(),
                e
            )));
        }

        tracing::debug!("Saved {} bytes to {:?}", value.len(), path);
        Ok(())
    }
}
