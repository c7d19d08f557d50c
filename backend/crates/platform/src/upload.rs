//! Upload Storage
//!
//! Image attachments (account icons, avatars, record photos) are written to a
//! local directory under generated names and referenced by URL path.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::crypto::random_bytes;

/// Accepted file extensions (lowercase)
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "heic", "heif",
];

/// URL prefix the upload directory is served under
pub const DEFAULT_URL_PREFIX: &str = "/uploads";

/// Random part of a generated file name, in bytes (hex doubles it)
const RANDOM_SUFFIX_BYTES: usize = 8;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("File has no extension")]
    MissingExtension,

    #[error("File type '.{0}' is not allowed")]
    UnsupportedExtension(String),

    #[error("Uploaded file is empty")]
    Empty,

    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// True when the client sent something unacceptable (vs. a disk failure)
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

/// Filesystem-backed upload store
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    url_prefix: String,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Create the upload directory if it does not exist
    pub async fn ensure_root(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Store `bytes` under a fresh name derived from `original_name`'s extension
    ///
    /// Returns the URL path (`/uploads/<name>`) to persist on the row.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }

        let extension = allowed_extension(original_name)?;
        let file_name = generate_file_name(&extension);

        self.ensure_root().await?;
        tokio::fs::write(self.root.join(&file_name), bytes).await?;

        tracing::debug!(file = %file_name, size = bytes.len(), "Upload stored");

        Ok(format!("{}/{}", self.url_prefix, file_name))
    }

    /// Resolve a stored URL path back to a file inside the upload directory
    ///
    /// Returns `None` for paths outside the prefix or with directory components.
    pub fn resolve(&self, url_path: &str) -> Option<PathBuf> {
        let name = url_path
            .strip_prefix(self.url_prefix.as_str())?
            .strip_prefix('/')?;

        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return None;
        }

        Some(self.root.join(name))
    }

    /// Remove a stored file; failures are logged and swallowed
    pub async fn remove(&self, url_path: &str) {
        let Some(path) = self.resolve(url_path) else {
            tracing::warn!(path = %url_path, "Refusing to remove path outside upload directory");
            return;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = %url_path, "Upload removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %url_path, error = %e, "Failed to remove upload"),
        }
    }
}

fn allowed_extension(original_name: &str) -> Result<String, UploadError> {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or(UploadError::MissingExtension)?;

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(UploadError::UnsupportedExtension(extension));
    }

    Ok(extension)
}

/// `<unix millis>-<16 hex chars>.<ext>`
fn generate_file_name(extension: &str) -> String {
    format!(
        "{}-{}.{}",
        chrono::Utc::now().timestamp_millis(),
        hex::encode(random_bytes(RANDOM_SUFFIX_BYTES)),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extension() {
        assert_eq!(allowed_extension("photo.JPG").unwrap(), "jpg");
        assert_eq!(allowed_extension("a.b.heic").unwrap(), "heic");
        assert!(matches!(
            allowed_extension("script.sh"),
            Err(UploadError::UnsupportedExtension(ext)) if ext == "sh"
        ));
        assert!(matches!(
            allowed_extension("noext"),
            Err(UploadError::MissingExtension)
        ));
    }

    #[test]
    fn test_generated_name_shape() {
        let name = generate_file_name("png");
        let (stem, ext) = name.rsplit_once('.').unwrap();
        let (millis, random) = stem.split_once('-').unwrap();

        assert_eq!(ext, "png");
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(random.len(), 16);
        assert!(
            random
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let store = UploadStore::new("/srv/uploads");

        assert_eq!(
            store.resolve("/uploads/1-abc.png"),
            Some(PathBuf::from("/srv/uploads/1-abc.png"))
        );
        assert_eq!(store.resolve("/uploads/../etc/passwd"), None);
        assert_eq!(store.resolve("/uploads/.hidden"), None);
        assert_eq!(store.resolve("/other/1-abc.png"), None);
        assert_eq!(store.resolve("/uploads/"), None);
    }

    #[tokio::test]
    async fn test_save_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("uploads"));

        let url = store.save("kid.webp", b"image-bytes").await.unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with(".webp"));

        let path = store.resolve(&url).unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"image-bytes");

        store.remove(&url).await;
        assert!(!path.exists());

        // Removing twice is a no-op
        store.remove(&url).await;
    }

    #[tokio::test]
    async fn test_save_rejects_empty_and_bad_type() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        assert!(matches!(
            store.save("a.png", b"").await,
            Err(UploadError::Empty)
        ));
        let err = store.save("a.exe", b"MZ").await.unwrap_err();
        assert!(err.is_client_error());
    }
}
