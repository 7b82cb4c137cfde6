//! Storage backends for backup artifacts.
//!
//! This module provides the capability every backend must satisfy and the
//! factory binding the configured variant, falling back to the local
//! directory whenever the remote side is unavailable.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tracing::warn;

use crate::catalog::Result;
use crate::catalog::ftp::FtpSession;
use crate::config::{BackendKind, Config};

pub mod local;
pub mod remote;

pub use local::LocalBackend;
pub use remote::FtpBackend;

/// Capability of a bound storage backend.
///
/// A catalog binds exactly one implementation for its entire lifetime and
/// runs every listing, grouping and naming operation through it.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Artifact names in the backend's natural enumeration order.
    async fn list_files(&self) -> Result<Vec<String>>;

    /// The grouping timestamp encoded in an artifact name, if any.
    ///
    /// Names failing the naming grammar are excluded from grouping.
    fn timestamp_of(&self, name: &str) -> Option<String>;

    /// The "now" token used when minting a name with no explicit timestamp.
    fn current_timestamp(&self) -> String;

    /// Remove one artifact from the backend.
    async fn delete(&self, name: &str) -> Result<()>;
}

/// Bind the storage backend selected by the config.
///
/// A remote configuration whose session cannot be established selects the
/// local backend exactly as if no server had been configured.
pub fn bind_backend(config: &Config) -> Result<Box<dyn StorageBackend>> {
    match config.backend_kind()? {
        BackendKind::Ftp => {
            let session = FtpSession::connect(
                config.ftp_server.as_deref(),
                config.ftp_user.as_deref(),
                config.ftp_password.as_deref(),
                config.ftp_path.as_deref(),
            );
            match session {
                Some(session) => Ok(Box::new(FtpBackend::new(session))),
                None => {
                    warn!("remote storage unavailable, falling back to local backend");
                    Ok(Box::new(LocalBackend::new(config)))
                }
            }
        }
        BackendKind::Local => Ok(Box::new(LocalBackend::new(config))),
    }
}
