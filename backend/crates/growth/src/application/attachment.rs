//! Upload helpers shared by the use cases

use platform::multipart::UploadedFile;
use platform::upload::UploadStore;

use crate::error::GrowthResult;

/// Store `file` if present and return its URL path
pub(crate) async fn store(
    uploads: &UploadStore,
    file: Option<&UploadedFile>,
) -> GrowthResult<Option<String>> {
    match file {
        Some(file) => Ok(Some(uploads.save(&file.file_name, &file.bytes).await?)),
        None => Ok(None),
    }
}

/// Best-effort removal of a stored file
pub(crate) async fn discard(uploads: &UploadStore, path: Option<&str>) {
    if let Some(path) = path {
        uploads.remove(path).await;
    }
}
