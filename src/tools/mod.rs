pub mod list_entries_tool;
pub mod search_name_tool;

use tracing::info;

use crate::config::LookupConfig;
use crate::utils::error::LookupError;
use crate::utils::pdf::extract_text_from_pdf_mem;
use crate::utils::upload::{read_bounded, UploadedFile};

/// Consumes a staged upload and returns its text. The upload is deleted
/// whether or not extraction succeeds.
pub async fn load_upload_text(config: &LookupConfig, file: &str) -> Result<String, LookupError> {
    let upload = UploadedFile::claim(&config.upload_dir, file)?;
    info!(target: "upload", path = %upload.path().display(), "Reading upload");
    let bytes = upload.read_and_release(config.max_pdf_bytes).await?;
    extract_text_from_pdf_mem(bytes, config.max_pdf_bytes).await
}

/// Like [`load_upload_text`] but for a caller-owned file that must not be deleted.
pub async fn load_local_text(
    path: &std::path::Path,
    max_pdf_bytes: u64,
) -> Result<String, LookupError> {
    let bytes = read_bounded(path, max_pdf_bytes).await?;
    extract_text_from_pdf_mem(bytes, max_pdf_bytes).await
}
