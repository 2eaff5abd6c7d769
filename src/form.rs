//! Rebuildable multipart request bodies.
//!
//! A `reqwest::multipart::Form` is consumed when the request is sent, but
//! the 401-refresh protocol may need to send the same body a second time.
//! `MultipartPayload` is an owned description of the body that materializes
//! a fresh `Form` for each attempt.

use crate::error::ApiError;

/// One file part of a multipart body.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name (the upload endpoints expect `file`).
    pub name: String,
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type; `application/octet-stream` when absent.
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

/// Owned multipart body: flat text fields plus file parts.
#[derive(Debug, Clone, Default)]
pub struct MultipartPayload {
    fields: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flat text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Add a file part.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.files.push(FilePart {
            name: name.into(),
            file_name: file_name.into(),
            mime,
            bytes,
        });
        self
    }

    /// Materialize a fresh `reqwest` form from this payload.
    pub(crate) fn to_form(&self) -> Result<reqwest::multipart::Form, ApiError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }
        for part in &self.files {
            let mime = part.mime.as_deref().unwrap_or("application/octet-stream");
            let part_builder = reqwest::multipart::Part::bytes(part.bytes.clone())
                .file_name(part.file_name.clone())
                .mime_str(mime)
                .map_err(|e| ApiError::Network(format!("invalid MIME type '{}': {}", mime, e)))?;
            form = form.part(part.name.clone(), part_builder);
        }
        Ok(form)
    }
}
