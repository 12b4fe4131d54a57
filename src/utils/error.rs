use serde_json::{json, Value};
use thiserror::Error;

/// Reasons the lookup pipeline could not run at all.
///
/// These are distinct from a lookup that ran and found nothing, which is a
/// regular [`crate::roster::MatchResult::NotFound`].
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Upload name must be a plain file name inside the upload directory: {0}")]
    InvalidUploadPath(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File is not a PDF document")]
    NotPdf,

    #[error("PDF exceeds the allowed size limit ({size} > {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    #[error("Encrypted PDF is not supported: {0}")]
    Encrypted(String),

    #[error("Failed to parse PDF content: {0}")]
    Parse(String),
}

impl LookupError {
    /// Stable machine-readable code reported to clients.
    pub fn code(&self) -> &'static str {
        match self {
            LookupError::InvalidUploadPath(_) => "ERR_UPLOAD_INVALID_PATH",
            LookupError::Read { .. } => "ERR_UPLOAD_READ",
            LookupError::NotPdf => "ERR_PDF_NOT_PDF",
            LookupError::TooLarge { .. } => "ERR_PDF_TOO_LARGE",
            LookupError::Encrypted(_) => "ERR_PDF_ENCRYPTED",
            LookupError::Parse(_) => "ERR_PDF_PARSE",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            LookupError::InvalidUploadPath(_) => {
                "Pass the bare name of a file staged in the upload directory"
            }
            LookupError::Read { .. } => "Check that the file was uploaded and is readable",
            LookupError::NotPdf => "Upload a PDF document",
            LookupError::TooLarge { .. } => "Split the document or raise --max-pdf-mb",
            LookupError::Encrypted(_) => {
                "Try providing an unencrypted PDF or remove password protection"
            }
            LookupError::Parse(_) => "Try another file or re-save the PDF to simplify its structure",
        }
    }

    /// Builds the textual tool error body: a human-readable first line, then a
    /// JSON object with `code`, `message` and `details`.
    pub fn to_payload(&self, details: Value) -> String {
        let message = self.to_string();
        let mut details = details;
        if let Some(obj) = details.as_object_mut() {
            obj.insert("hint".to_string(), Value::String(self.hint().to_string()));
        }
        let obj = json!({
            "code": self.code(),
            "message": message,
            "details": details,
        });
        format!("{}\n{}", message, obj)
    }
}
