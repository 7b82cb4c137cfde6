//! Typed configuration loaded from the settings document.
//!
//! The document is YAML with a flat key set; loading it has one documented
//! side effect: the file is rewritten in canonical form. Re-reading a
//! canonicalized document yields the same config and performs no write.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogError, Result};

/// Storage backend variants a settings document can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Local,
    Ftp,
}

/// Fixed registry of backend names; the `storage` key must name one of these.
const BACKEND_REGISTRY: &[(&str, BackendKind)] = &[
    ("local", BackendKind::Local),
    ("ftp", BackendKind::Ftp),
];

/// Resolved settings for one catalog session, immutable after loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend discriminator, resolved against the registry
    #[serde(default = "default_storage")]
    pub storage: String,

    /// Directory holding backup artifacts when the local backend is bound
    #[serde(default = "default_local_dir")]
    pub local_dir: PathBuf,

    /// Prefix every artifact name starts with
    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ftp_server: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ftp_user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ftp_password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ftp_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            local_dir: default_local_dir(),
            prefix: default_prefix(),
            ftp_server: None,
            ftp_user: None,
            ftp_password: None,
            ftp_path: None,
        }
    }
}

impl Config {
    /// Load the settings document, creating it with defaults when absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            fs::write(path, config.to_canonical()?)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path)?;
        let config: Self = if contents.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(&contents)
                .map_err(|e| CatalogError::Config(format!("{}: {}", path.display(), e)))?
        };

        // unknown discriminators are rejected before anything touches storage
        config.backend_kind()?;

        let canonical = config.to_canonical()?;
        if canonical != contents {
            fs::write(path, canonical)?;
        }
        Ok(config)
    }

    /// Resolve the effective backend kind for this session.
    ///
    /// The discriminator must name a registered backend. A remote
    /// discriminator without server credentials resolves to the local
    /// backend: absent `ftp_*` keys signal "use local", not an error.
    pub fn backend_kind(&self) -> Result<BackendKind> {
        let kind = BACKEND_REGISTRY
            .iter()
            .find(|(name, _)| *name == self.storage)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| CatalogError::UnknownBackend(self.storage.clone()))?;
        if kind == BackendKind::Ftp && (self.ftp_server.is_none() || self.ftp_user.is_none()) {
            return Ok(BackendKind::Local);
        }
        Ok(kind)
    }

    fn to_canonical(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| CatalogError::Config(e.to_string()))
    }
}

fn default_storage() -> String {
    String::from("local")
}

fn default_local_dir() -> PathBuf {
    PathBuf::from("backups")
}

fn default_prefix() -> String {
    String::from("db-backup")
}
