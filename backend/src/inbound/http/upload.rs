//! `multipart/form-data` parsing for evidence uploads.
//!
//! A form carries text fields plus at most one file part named `file`. File
//! bytes are buffered up to the configured limit while streaming, so an
//! oversized upload is rejected before it is fully read.

use std::collections::HashMap;

use actix_multipart::{Field, Multipart, MultipartError};
use futures_util::TryStreamExt;
use tracing::debug;

use crate::domain::Error;
use crate::domain::ports::IncomingFile;

/// Name of the single accepted file field.
pub const FILE_FIELD: &str = "file";

const MAX_TEXT_FIELD_BYTES: u64 = 64 * 1024;
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Text fields and the optional file of one evidence form.
#[derive(Debug, Default)]
pub struct EvidenceForm {
    pub fields: HashMap<String, String>,
    pub file: Option<IncomingFile>,
}

impl EvidenceForm {
    /// Remove and return a text field.
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }
}

fn malformed(err: MultipartError) -> Error {
    Error::invalid_request(format!("malformed multipart body: {err}"))
}

async fn read_limited(field: &mut Field, limit: u64, name: &str) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        if (bytes.len() + chunk.len()) as u64 > limit {
            return Err(Error::invalid_request(format!(
                "field '{name}' exceeds the maximum size of {limit} bytes"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Read an evidence form, enforcing the one-file rule and `max_file_bytes`.
pub async fn read_evidence_form(
    mut payload: Multipart,
    max_file_bytes: u64,
) -> Result<EvidenceForm, Error> {
    let mut form = EvidenceForm::default();
    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .map(str::to_owned);

        let Some(file_name) = file_name else {
            let bytes = read_limited(&mut field, MAX_TEXT_FIELD_BYTES, &name).await?;
            let value = String::from_utf8(bytes)
                .map_err(|_| Error::invalid_request(format!("field '{name}' is not valid UTF-8")))?;
            form.fields.insert(name, value);
            continue;
        };

        if name != FILE_FIELD {
            return Err(Error::invalid_request(format!(
                "unexpected file field '{name}'; send the file as '{FILE_FIELD}'"
            )));
        }
        if form.file.is_some() {
            return Err(Error::invalid_request(
                "only one file may be uploaded per request",
            ));
        }
        let content_type = field
            .content_type()
            .map_or_else(|| DEFAULT_CONTENT_TYPE.to_owned(), |mime| mime.essence_str().to_owned());
        let bytes = read_limited(&mut field, max_file_bytes, FILE_FIELD).await?;
        if file_name.is_empty() && bytes.is_empty() {
            // Browsers send an empty part when no file was chosen.
            continue;
        }
        debug!(bytes = bytes.len(), %content_type, "received evidence file part");
        form.file = Some(IncomingFile {
            original_name: Some(file_name).filter(|name| !name.is_empty()),
            content_type,
            bytes,
        });
    }
    Ok(form)
}
