//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Builder-style configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) upload_dir: PathBuf,
    pub(crate) cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Serve on `bind_addr`, exposing stored uploads from `upload_dir`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr,
            upload_dir: upload_dir.into(),
            cors_origins: Vec::new(),
        }
    }

    /// Restrict CORS to `origins`. An empty list allows any origin.
    #[must_use]
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Directory served under `/uploads`.
    #[must_use]
    pub fn upload_dir(&self) -> &PathBuf {
        &self.upload_dir
    }
}
