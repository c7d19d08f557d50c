//! Multipart Form Reading
//!
//! Upload endpoints take `multipart/form-data` with text fields plus at most
//! one file part. This module buffers the whole form so handlers can validate
//! fields before anything touches the disk.

use std::collections::HashMap;

use axum::extract::Multipart;
use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Unexpected file field '{0}'")]
    UnexpectedFile(String),

    #[error("File field '{0}' was sent more than once")]
    DuplicateFile(String),

    #[error("Request body is too large")]
    TooLarge,

    #[error("Malformed multipart body: {0}")]
    Malformed(String),
}

/// A buffered file part
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Buffered form: text fields by name, plus the single allowed file
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    file: Option<UploadedFile>,
}

impl FormData {
    /// Text field, trimmed; blank counts as absent
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Text field exactly as sent
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    pub fn take_file(&mut self) -> Option<UploadedFile> {
        self.file.take()
    }

    /// Build a form directly (tests and non-HTTP callers)
    pub fn from_parts(
        fields: impl IntoIterator<Item = (String, String)>,
        file: Option<UploadedFile>,
    ) -> Self {
        Self {
            fields: fields.into_iter().collect(),
            file,
        }
    }
}

/// Read every part of `multipart`, accepting a file only under `file_field`
///
/// A file part with an empty file name and no content (what browsers send
/// for an untouched file input) is treated as no file.
pub async fn read_form(mut multipart: Multipart, file_field: &str) -> Result<FormData, FormError> {
    let mut form = FormData::default();

    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let bytes = field.bytes().await.map_err(map_multipart_error)?;
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                if name != file_field {
                    return Err(FormError::UnexpectedFile(name));
                }
                if form.file.is_some() {
                    return Err(FormError::DuplicateFile(name));
                }
                form.file = Some(UploadedFile {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            None => {
                let value = field.text().await.map_err(map_multipart_error)?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}

fn map_multipart_error(err: axum::extract::multipart::MultipartError) -> FormError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        FormError::TooLarge
    } else {
        FormError::Malformed(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(fields: &[(&str, &str)]) -> FormData {
        FormData::from_parts(
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
            None,
        )
    }

    #[test]
    fn test_text_trims_and_treats_blank_as_absent() {
        let form = form(&[("name", "  Taro "), ("memo", "   "), ("empty", "")]);

        assert_eq!(form.text("name"), Some("Taro"));
        assert_eq!(form.text("memo"), None);
        assert_eq!(form.text("empty"), None);
        assert_eq!(form.text("missing"), None);
    }

    #[test]
    fn test_raw_keeps_whitespace() {
        let form = form(&[("memo", "  first steps\n"), ("blank", "  ")]);

        assert_eq!(form.raw("memo"), Some("  first steps\n"));
        assert_eq!(form.raw("blank"), Some("  "));
        assert_eq!(form.raw("missing"), None);
    }

    #[test]
    fn test_take_file() {
        let mut form = FormData::from_parts(
            Vec::new(),
            Some(UploadedFile {
                file_name: "a.png".to_string(),
                bytes: vec![1, 2, 3],
            }),
        );

        assert_eq!(form.file().map(|f| f.bytes.len()), Some(3));
        assert!(form.take_file().is_some());
        assert!(form.file().is_none());
    }
}
