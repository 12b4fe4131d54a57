use std::path::PathBuf;

use crate::roster::DEFAULT_MARKER_WIDTH;

pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_MAX_PDF_MB: u64 = 50;
pub const MAX_MARKER_WIDTH: usize = 12;

/// Settings shared by the server and the tools. Built once in `main` and passed down.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Directory where clients stage uploads; files are deleted after they are read.
    pub upload_dir: PathBuf,
    /// Number of digits in the identifiers that delimit roster entries.
    pub marker_width: usize,
    pub max_pdf_bytes: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            marker_width: DEFAULT_MARKER_WIDTH,
            max_pdf_bytes: DEFAULT_MAX_PDF_MB * 1024 * 1024,
        }
    }
}
