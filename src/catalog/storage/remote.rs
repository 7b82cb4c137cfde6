//! FTP implementation of the StorageBackend trait.
//!
//! The backend owns the session opened during bootstrap, so the control
//! connection lives exactly as long as the catalog that bound it and is
//! released when the backend drops.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::StorageBackend;
use crate::catalog::ftp::FtpSession;
use crate::catalog::{Result, naming};

/// Stores backup artifacts in a directory on a remote FTP server.
pub struct FtpBackend {
    session: Mutex<FtpSession>,
}

impl FtpBackend {
    pub fn new(session: FtpSession) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }
}

#[async_trait]
impl StorageBackend for FtpBackend {
    async fn list_files(&self) -> Result<Vec<String>> {
        let names = self.session.lock().await.list_names()?;
        debug!("remote listing returned {} names", names.len());
        Ok(names)
    }

    fn timestamp_of(&self, name: &str) -> Option<String> {
        naming::extract_timestamp(name)
    }

    fn current_timestamp(&self) -> String {
        naming::current_timestamp()
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.session.lock().await.remove(name)
    }
}
