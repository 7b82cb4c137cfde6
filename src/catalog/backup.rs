//! Backup catalog: groups dump artifacts into point-in-time backup sets.

use std::collections::HashSet;

use tokio::sync::OnceCell;
use tracing::warn;

use crate::catalog::storage::{self, StorageBackend};
use crate::catalog::{Result, naming};
use crate::config::Config;

/// Catalog of backup artifacts behind a single bound storage backend.
///
/// One catalog is bound to exactly one backend for its entire lifetime and
/// fetches the artifact listing at most once. There is no invalidation: a
/// new process invocation gets a fresh catalog and a fresh listing.
pub struct BackupCatalog {
    config: Config,
    backend: Box<dyn StorageBackend>,
    files: OnceCell<Vec<String>>,
}

impl BackupCatalog {
    /// Bind the backend selected by the config and open a catalog over it.
    pub async fn open(config: Config) -> Result<Self> {
        let backend = storage::bind_backend(&config)?;
        Ok(Self::with_backend(config, backend))
    }

    /// Open a catalog over an already-constructed backend.
    pub fn with_backend(config: Config, backend: Box<dyn StorageBackend>) -> Self {
        Self {
            config,
            backend,
            files: OnceCell::new(),
        }
    }

    /// The memoized artifact listing, fetched from the backend at most once.
    async fn files(&self) -> Result<&[String]> {
        let files = self
            .files
            .get_or_try_init(|| self.backend.list_files())
            .await?;
        Ok(files.as_slice())
    }

    /// Distinct timestamps in first-seen listing order.
    pub async fn list_timestamps(&self) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut timestamps = Vec::new();
        for name in self.files().await? {
            if let Some(timestamp) = self.backend.timestamp_of(name) {
                if seen.insert(timestamp.clone()) {
                    timestamps.push(timestamp);
                }
            }
        }
        Ok(timestamps)
    }

    /// Artifacts carrying the given timestamp, in original listing order.
    ///
    /// Restartable: every call re-filters the same memoized listing and
    /// never re-queries the backend.
    pub async fn files_for_timestamp(&self, timestamp: &str) -> Result<Vec<String>> {
        let mut matches = Vec::new();
        for name in self.files().await? {
            if self.backend.timestamp_of(name).as_deref() == Some(timestamp) {
                matches.push(name.clone());
            }
        }
        Ok(matches)
    }

    /// Whether the timestamp names a known backup set.
    ///
    /// An unknown or empty timestamp is reported to the user and answered
    /// with `false`; it is never an error.
    pub async fn is_valid_timestamp(&self, timestamp: &str) -> Result<bool> {
        if !timestamp.is_empty() && self.list_timestamps().await?.iter().any(|t| t == timestamp) {
            return Ok(true);
        }
        warn!("invalid id; use the history command to list existing backups");
        Ok(false)
    }

    /// Canonical artifact name for an entity.
    ///
    /// A supplied timestamp is used verbatim: minting a name for a
    /// brand-new artifact must not require it to exist already.
    pub fn name_for(&self, entity: &str, timestamp: Option<&str>) -> String {
        let timestamp = match timestamp {
            Some(timestamp) => timestamp.to_string(),
            None => self.backend.current_timestamp(),
        };
        naming::artifact_name(&self.config.prefix, &timestamp, entity)
    }

    /// Delete every artifact of one backup set, returning the deleted names.
    pub async fn remove_timestamp(&self, timestamp: &str) -> Result<Vec<String>> {
        let files = self.files_for_timestamp(timestamp).await?;
        for name in &files {
            self.backend.delete(name).await?;
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::storage::MockStorageBackend;
    use tempfile::tempdir;

    fn sample_listing() -> Vec<String> {
        vec![
            "db-backup-1700000000-User.gz".to_string(),
            "db-backup-1700000000-Order.gz".to_string(),
            "db-backup-1700000100-User.gz".to_string(),
            "garbage.txt".to_string(),
        ]
    }

    fn mock_backend(listing: Vec<String>, list_calls: usize) -> MockStorageBackend {
        let mut backend = MockStorageBackend::new();
        backend
            .expect_list_files()
            .times(list_calls)
            .returning(move || Ok(listing.clone()));
        backend
            .expect_timestamp_of()
            .returning(|name| naming::extract_timestamp(name));
        backend
    }

    #[tokio::test]
    async fn test_timestamps_in_first_seen_order_and_memoized() {
        // the backend may be queried for its listing exactly once
        let backend = mock_backend(sample_listing(), 1);
        let catalog = BackupCatalog::with_backend(Config::default(), Box::new(backend));

        let first = catalog.list_timestamps().await.unwrap();
        assert_eq!(first, vec!["1700000000", "1700000100"]);

        let second = catalog.list_timestamps().await.unwrap();
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_files_for_timestamp_filters_in_listing_order() {
        let backend = mock_backend(sample_listing(), 1);
        let catalog = BackupCatalog::with_backend(Config::default(), Box::new(backend));

        let set = catalog.files_for_timestamp("1700000000").await.unwrap();
        assert_eq!(
            set,
            vec!["db-backup-1700000000-User.gz", "db-backup-1700000000-Order.gz"]
        );

        // restartable: same result against the same memoized listing
        assert_eq!(catalog.files_for_timestamp("1700000000").await.unwrap(), set);

        assert_eq!(
            catalog.files_for_timestamp("1700000100").await.unwrap(),
            vec!["db-backup-1700000100-User.gz"]
        );
    }

    #[tokio::test]
    async fn test_is_valid_timestamp() {
        let backend = mock_backend(sample_listing(), 1);
        let catalog = BackupCatalog::with_backend(Config::default(), Box::new(backend));

        assert!(catalog.is_valid_timestamp("1700000000").await.unwrap());
        assert!(!catalog.is_valid_timestamp("1234567890").await.unwrap());
        assert!(!catalog.is_valid_timestamp("").await.unwrap());
    }

    #[test]
    fn test_name_for_uses_a_supplied_timestamp_verbatim() {
        let mut backend = MockStorageBackend::new();
        backend.expect_current_timestamp().never();
        let catalog = BackupCatalog::with_backend(Config::default(), Box::new(backend));

        assert_eq!(
            catalog.name_for("Widget", Some("1700000000")),
            "db-backup-1700000000-Widget.gz"
        );
    }

    #[test]
    fn test_name_for_defaults_to_the_clock_token() {
        let mut backend = MockStorageBackend::new();
        backend
            .expect_current_timestamp()
            .times(1)
            .return_const("1700000200".to_string());
        let catalog = BackupCatalog::with_backend(Config::default(), Box::new(backend));

        assert_eq!(
            catalog.name_for("Widget", None),
            "db-backup-1700000200-Widget.gz"
        );
    }

    #[tokio::test]
    async fn test_remove_timestamp_deletes_the_whole_set() {
        let mut backend = mock_backend(sample_listing(), 1);
        backend.expect_delete().times(2).returning(|_| Ok(()));
        let catalog = BackupCatalog::with_backend(Config::default(), Box::new(backend));

        let removed = catalog.remove_timestamp("1700000000").await.unwrap();
        assert_eq!(
            removed,
            vec!["db-backup-1700000000-User.gz", "db-backup-1700000000-Order.gz"]
        );
    }

    #[tokio::test]
    async fn test_catalog_over_a_local_backend() {
        let temp = tempdir().unwrap();
        for name in sample_listing() {
            tokio::fs::write(temp.path().join(&name), b"data").await.unwrap();
        }

        let config = Config {
            local_dir: temp.path().to_path_buf(),
            ..Config::default()
        };
        let backend = storage::bind_backend(&config).unwrap();
        let catalog = BackupCatalog::with_backend(config, backend);

        // directory enumeration order is not specified, so compare sorted
        let mut timestamps = catalog.list_timestamps().await.unwrap();
        timestamps.sort();
        assert_eq!(timestamps, vec!["1700000000", "1700000100"]);

        let mut set = catalog.files_for_timestamp("1700000000").await.unwrap();
        set.sort();
        assert_eq!(
            set,
            vec!["db-backup-1700000000-Order.gz", "db-backup-1700000000-User.gz"]
        );
        assert!(catalog.is_valid_timestamp("1700000000").await.unwrap());
    }
}
