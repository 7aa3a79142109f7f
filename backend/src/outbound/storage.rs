//! Local-disk adapter for the [`FileStorage`] port.
//!
//! Files are written under a configured directory with a generated
//! `<uuid>.<ext>` name and exposed read-only by the HTTP server under
//! `/uploads`. Client file names are only used to pick the extension.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;
use url::Url;
use uuid::Uuid;

use crate::domain::ports::{FileStorage, FileStorageError, IncomingFile, StoredFile};

/// URL path segment under which stored files are served.
pub const UPLOADS_ROUTE: &str = "/uploads";

const MAX_EXTENSION_LEN: usize = 8;

/// Limits applied before a file is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: u64,
    pub allowed_types: Vec<String>,
}

impl UploadPolicy {
    fn check(&self, file: &IncomingFile) -> Result<(), FileStorageError> {
        if file.bytes.is_empty() {
            return Err(FileStorageError::rejected("uploaded file is empty"));
        }
        if file.bytes.len() as u64 > self.max_bytes {
            return Err(FileStorageError::rejected(format!(
                "file exceeds the maximum size of {} bytes",
                self.max_bytes
            )));
        }
        let content_type = file.content_type.to_ascii_lowercase();
        if !self
            .allowed_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&content_type))
        {
            return Err(FileStorageError::rejected(format!(
                "file type '{}' is not allowed; allowed types: {}",
                file.content_type,
                self.allowed_types.join(", ")
            )));
        }
        Ok(())
    }
}

/// Stores uploads on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
    public_base: Url,
    policy: UploadPolicy,
}

impl LocalFileStorage {
    /// Create an adapter writing to `root` and publishing URLs under
    /// `<public_base>/uploads/`.
    pub fn new(root: impl Into<PathBuf>, public_base: Url, policy: UploadPolicy) -> Self {
        Self {
            root: root.into(),
            public_base,
            policy,
        }
    }

    /// Directory files are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn public_url(&self, name: &str) -> String {
        let base = self.public_base.as_str().trim_end_matches('/');
        format!("{base}{UPLOADS_ROUTE}/{name}")
    }
}

/// Pick a safe extension from the client file name, falling back to the
/// content type.
fn extension_for(file: &IncomingFile) -> Option<String> {
    let from_name = file
        .original_name
        .as_deref()
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        });
    from_name.or_else(|| {
        let ext = match file.content_type.to_ascii_lowercase().as_str() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/webp" => "webp",
            "application/pdf" => "pdf",
            _ => return None,
        };
        Some(ext.to_owned())
    })
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(&self, file: IncomingFile) -> Result<StoredFile, FileStorageError> {
        self.policy.check(&file)?;

        fs::create_dir_all(&self.root).await.map_err(|err| {
            FileStorageError::io(format!("failed to create upload directory: {err}"))
        })?;

        let id = Uuid::new_v4();
        let name = match extension_for(&file) {
            Some(ext) => format!("{id}.{ext}"),
            None => id.to_string(),
        };
        let path = self.root.join(&name);

        let mut handle = fs::File::create(&path)
            .await
            .map_err(|err| FileStorageError::io(format!("failed to create file: {err}")))?;
        handle
            .write_all(&file.bytes)
            .await
            .map_err(|err| FileStorageError::io(format!("failed to write file: {err}")))?;
        handle
            .flush()
            .await
            .map_err(|err| FileStorageError::io(format!("failed to flush file: {err}")))?;

        let digest = hex::encode(Sha256::digest(&file.bytes));
        info!(
            file = %name,
            bytes = file.bytes.len(),
            content_type = %file.content_type,
            sha256 = %digest,
            "upload stored"
        );

        Ok(StoredFile {
            url: self.public_url(&name),
            name,
        })
    }
}
