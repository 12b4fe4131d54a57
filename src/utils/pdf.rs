// PDF helpers used by the lookup tools and the one-shot CLI.
// Text extraction itself is delegated to the `pdf-extract` crate.

use std::time::Instant;

use tracing::{info, warn};

use super::error::LookupError;

/// Returns true if the head bytes carry the `%PDF-` signature.
/// Some writers emit a few junk bytes first, so the first KiB is searched.
pub fn is_pdf(head: &[u8]) -> bool {
    const MAGIC: &[u8] = b"%PDF-";
    let limit = head.len().min(1024);
    head[..limit].windows(MAGIC.len()).any(|w| w == MAGIC)
}

/// Maps a `pdf-extract` failure message onto the matching error kind.
fn classify_extract_error(message: String) -> LookupError {
    let lowered = message.to_ascii_lowercase();
    if lowered.contains("encrypt") || lowered.contains("password") {
        LookupError::Encrypted(message)
    } else {
        LookupError::Parse(message)
    }
}

/// Extracts plain text from PDF bytes held in memory.
///
/// Parsing runs on the blocking pool. `pdf-extract` panics on some malformed
/// documents; a panicked task is reported as a parse error.
pub async fn extract_text_from_pdf_mem(bytes: Vec<u8>, limit: u64) -> Result<String, LookupError> {
    let size = bytes.len() as u64;
    if size > limit {
        info!(target: "pdf", size, limit, "PDF too large; refusing");
        return Err(LookupError::TooLarge { size, limit });
    }
    if !is_pdf(&bytes) {
        return Err(LookupError::NotPdf);
    }

    info!(target: "pdf", size, "Starting PDF text extraction");
    let started = Instant::now();

    let joined = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
    })
    .await;
    match joined {
        Ok(Ok(text)) => {
            info!(
                target: "pdf",
                elapsed_ms = started.elapsed().as_millis() as u64,
                chars = text.chars().count(),
                "PDF extraction succeeded"
            );
            Ok(text)
        }
        Ok(Err(message)) => {
            let err = classify_extract_error(message);
            warn!(target: "pdf", code = err.code(), "PDF extraction failed: {}", err);
            Err(err)
        }
        Err(join_err) => {
            warn!(target: "pdf", "PDF extractor aborted: {}", join_err);
            Err(LookupError::Parse(
                "the PDF extractor aborted on this document".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{classify_extract_error, extract_text_from_pdf_mem, is_pdf};
    use crate::roster::{find_name, EntryExtractor, MatchResult};
    use crate::test_support::roster_pdf;
    use crate::utils::error::LookupError;

    #[test]
    fn detects_pdf_signature() {
        assert!(is_pdf(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3"));
        assert!(is_pdf(b"\r\n%PDF-1.4"));
        assert!(!is_pdf(b"<html><body>not a pdf</body></html>"));
        assert!(!is_pdf(b""));
    }

    #[test]
    fn classifies_encryption_failures() {
        assert!(matches!(
            classify_extract_error("document is Encrypted".into()),
            LookupError::Encrypted(_)
        ));
        assert!(matches!(
            classify_extract_error("invalid xref table".into()),
            LookupError::Parse(_)
        ));
    }

    #[tokio::test]
    async fn rejects_non_pdf_bytes() {
        let err = extract_text_from_pdf_mem(b"plain text".to_vec(), 1024)
            .await
            .expect_err("not a pdf");
        assert!(matches!(err, LookupError::NotPdf));
    }

    #[tokio::test]
    async fn rejects_oversized_documents_before_parsing() {
        let err = extract_text_from_pdf_mem(b"%PDF-1.4 padding".to_vec(), 4)
            .await
            .expect_err("too large");
        assert!(matches!(err, LookupError::TooLarge { size: 16, limit: 4 }));
    }

    #[tokio::test]
    async fn reports_truncated_pdf_as_parse_error() {
        let err = extract_text_from_pdf_mem(b"%PDF-1.4\n1 0 obj\n".to_vec(), 1024)
            .await
            .expect_err("truncated pdf");
        assert!(matches!(
            err,
            LookupError::Parse(_) | LookupError::Encrypted(_)
        ));
    }

    #[tokio::test]
    async fn extracted_text_feeds_the_name_lookup() {
        let pdf = roster_pdf(&["1234 علي حسن", "5678 محمد احمد"]);
        let text = extract_text_from_pdf_mem(pdf, 1024 * 1024)
            .await
            .expect("extract text");
        assert!(text.contains("1234"));
        assert!(text.contains("5678"));

        match find_name(&EntryExtractor::default(), &text, "على حسن") {
            MatchResult::Found(entry) => {
                assert_eq!(entry.number(), "1234");
                assert_eq!(entry.original_name(), "علي حسن");
            }
            MatchResult::NotFound => panic!("expected a match in {text:?}"),
        }
    }
}
