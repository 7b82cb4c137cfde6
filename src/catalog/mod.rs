//! Backup-set cataloging: timestamp grouping, pluggable storage backends
//! and the scoped remote connection used to bootstrap them.

pub mod backup;
pub mod ftp;
pub mod naming;
pub mod storage;

pub use backup::BackupCatalog;

/// Error type for catalog operations
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown storage backend: {0}")]
    UnknownBackend(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("couldn't connect to {0}")]
    Connection(String),

    #[error("path doesn't exist: {0}")]
    Path(String),
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
