//! Scoped FTP connection used to bootstrap the remote backend.
//!
//! The session owns the control connection for exactly one catalog
//! lifetime. Bootstrap failures are capability signals, not crashes: the
//! caller selects the local backend whenever `connect` yields `None`.

use suppaftp::{FtpError, FtpStream};
use tracing::{info, warn};

use crate::catalog::{CatalogError, Result};

const FTP_PORT: u16 = 21;

/// Directory-change success is signalled only by the 250 reply class.
fn dir_change_ok(code: u32) -> bool {
    (250..260).contains(&code)
}

/// An open FTP control connection, released exactly once.
pub struct FtpSession {
    stream: Option<FtpStream>,
}

impl FtpSession {
    /// Try to open a session from optional remote settings.
    ///
    /// A network handshake is attempted only when both server and user are
    /// present; their absence signals "use the local backend" and returns
    /// `None` without dialing. Handshake and directory-change failures are
    /// logged as warnings and also collapse to `None`.
    pub fn connect(
        server: Option<&str>,
        user: Option<&str>,
        password: Option<&str>,
        path: Option<&str>,
    ) -> Option<Self> {
        let (server, user) = match (server, user) {
            (Some(server), Some(user)) => (server, user),
            _ => return None,
        };
        match Self::open(server, user, password, path) {
            Ok(session) => {
                info!("connected to {}", server);
                Some(session)
            }
            Err(err) => {
                warn!("{}", err);
                None
            }
        }
    }

    fn open(server: &str, user: &str, password: Option<&str>, path: Option<&str>) -> Result<Self> {
        let mut stream = FtpStream::connect(format!("{}:{}", server, FTP_PORT))
            .map_err(|_| CatalogError::Connection(server.to_string()))?;
        stream
            .login(user, password.unwrap_or(""))
            .map_err(|_| CatalogError::Connection(server.to_string()))?;
        let mut session = Self {
            stream: Some(stream),
        };
        if let Some(path) = path {
            if let Err(err) = session.change_dir(path) {
                session.close();
                return Err(err);
            }
        }
        Ok(session)
    }

    /// Change the remote working directory.
    ///
    /// Only a reply in the 250 class counts as success; any other reply
    /// means the path does not exist on the server.
    fn change_dir(&mut self, path: &str) -> Result<()> {
        let stream = self.active()?;
        let code = match stream.cwd(path) {
            Ok(()) => 250,
            Err(FtpError::UnexpectedResponse(response)) => response.status as u32,
            Err(err) => return Err(CatalogError::Storage(err.to_string())),
        };
        if dir_change_ok(code) {
            Ok(())
        } else {
            Err(CatalogError::Path(path.to_string()))
        }
    }

    /// Artifact names in the remote directory, in server enumeration order.
    pub fn list_names(&mut self) -> Result<Vec<String>> {
        self.active()?
            .nlst(None)
            .map_err(|e| CatalogError::Storage(e.to_string()))
    }

    /// Delete one artifact on the server.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        self.active()?
            .rm(name)
            .map_err(|e| CatalogError::Storage(e.to_string()))
    }

    /// Release the connection. Closing an already-closed session is a no-op.
    pub fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.quit();
        }
    }

    fn active(&mut self) -> Result<&mut FtpStream> {
        self.stream
            .as_mut()
            .ok_or_else(|| CatalogError::Storage(String::from("FTP session already closed")))
    }
}

impl Drop for FtpSession {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_change_reply_classes() {
        assert!(dir_change_ok(250));
        assert!(dir_change_ok(257));
        assert!(!dir_change_ok(226));
        assert!(!dir_change_ok(421));
        assert!(!dir_change_ok(550));
    }

    #[test]
    fn test_connect_requires_server_and_user() {
        // no handshake is attempted when either field is absent
        assert!(FtpSession::connect(None, None, None, None).is_none());
        assert!(FtpSession::connect(Some("ftp.example.com"), None, None, None).is_none());
        assert!(FtpSession::connect(None, Some("backup"), Some("secret"), None).is_none());
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut session = FtpSession { stream: None };
        session.close();
        session.close();
        assert!(session.active().is_err());
    }
}
