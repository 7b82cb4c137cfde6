//! Local filesystem implementation of the StorageBackend trait, used for
//! development and as the fallback when the remote server is unavailable.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs as tokio_fs;

use super::StorageBackend;
use crate::catalog::{Result, naming};
use crate::config::Config;

/// Stores backup artifacts in a directory on the local filesystem.
pub struct LocalBackend {
    dir: PathBuf,
}

impl LocalBackend {
    pub fn new(config: &Config) -> Self {
        Self {
            dir: config.local_dir.clone(),
        }
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    async fn list_files(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = tokio_fs::read_dir(&self.dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.path().is_file() {
                let file_name = entry.file_name();
                if let Some(name) = file_name.to_str() {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }

    fn timestamp_of(&self, name: &str) -> Option<String> {
        naming::extract_timestamp(name)
    }

    fn current_timestamp(&self) -> String {
        naming::current_timestamp()
    }

    async fn delete(&self, name: &str) -> Result<()> {
        tokio_fs::remove_file(self.dir.join(name)).await?;
        Ok(())
    }
}
