//! Port abstraction for storing uploaded evidence files.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by file storage adapters.
    pub enum FileStorageError {
        /// The file was rejected before being written.
        Rejected { message: String } => "file rejected: {message}",
        /// Writing to the backing store failed.
        Io { message: String } => "file storage failed: {message}",
    }
}

/// A single file received with an evidence creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingFile {
    /// Client supplied file name, used only for its extension.
    pub original_name: Option<String>,
    /// Declared MIME type.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Reference to a stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Generated storage name, `<uuid>.<ext>`.
    pub name: String,
    /// Public URL clients use to retrieve the file.
    pub url: String,
}

/// Durable storage for uploaded files.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Persist the file and return its public reference.
    async fn store(&self, file: IncomingFile) -> Result<StoredFile, FileStorageError>;
}
