use async_trait::async_trait;
use tracing::debug;

use crate::source::{ExtractionError, SourceDocument, SourceExtractor};

const PDF_SIGNATURE: &[u8] = b"%PDF";
const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "markdown"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Pdf,
    PlainText,
}

/// Production extractor: PDFs via `pdf-extract`, plain text and markdown as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentTextExtractor;

#[async_trait]
impl SourceExtractor for DocumentTextExtractor {
    async fn extract_text(&self, document: &SourceDocument) -> Result<String, ExtractionError> {
        let text = match detect_kind(document)? {
            DocumentKind::Pdf => {
                // pdf-extract is CPU-bound and synchronous
                let bytes = document.bytes.clone();
                tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                    .await
                    .map_err(|e| ExtractionError::Pdf(format!("extraction task failed: {e}")))?
                    .map_err(|e| ExtractionError::Pdf(e.to_string()))?
            }
            DocumentKind::PlainText => String::from_utf8(document.bytes.to_vec())
                .map_err(|_| ExtractionError::Unsupported("text is not valid UTF-8".to_string()))?,
        };

        debug!("Extracted {} characters from source document", text.chars().count());

        if text.trim().is_empty() {
            return Err(ExtractionError::Empty);
        }
        Ok(text)
    }
}

fn detect_kind(document: &SourceDocument) -> Result<DocumentKind, ExtractionError> {
    if document.bytes.starts_with(PDF_SIGNATURE) {
        return Ok(DocumentKind::Pdf);
    }

    let extension = document
        .file_name
        .as_deref()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_lowercase());

    let is_text_extension = extension
        .as_deref()
        .is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext));
    let is_text_mime = document
        .content_type
        .as_deref()
        .is_some_and(|mime| mime.starts_with("text/"));

    if is_text_extension || is_text_mime {
        Ok(DocumentKind::PlainText)
    } else {
        Err(ExtractionError::Unsupported(
            extension.unwrap_or_else(|| "unknown".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn doc(name: &str, content_type: Option<&str>, bytes: &'static [u8]) -> SourceDocument {
        SourceDocument {
            file_name: Some(name.to_string()),
            content_type: content_type.map(String::from),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[test]
    fn test_detects_pdf_by_signature_regardless_of_name() {
        let d = doc("resume.bin", None, b"%PDF-1.7 ...");
        assert_eq!(detect_kind(&d).unwrap(), DocumentKind::Pdf);
    }

    #[test]
    fn test_detects_text_by_extension_or_mime() {
        assert_eq!(
            detect_kind(&doc("CV.MD", None, b"# Jane")).unwrap(),
            DocumentKind::PlainText
        );
        assert_eq!(
            detect_kind(&doc("upload", Some("text/plain"), b"Jane")).unwrap(),
            DocumentKind::PlainText
        );
    }

    #[test]
    fn test_rejects_unknown_type() {
        let err = detect_kind(&doc("resume.docx", None, b"PK\x03\x04")).unwrap_err();
        assert!(matches!(err, ExtractionError::Unsupported(ext) if ext == "docx"));
    }

    #[tokio::test]
    async fn test_plain_text_passes_through() {
        let text = DocumentTextExtractor
            .extract_text(&doc("resume.txt", None, b"Jane Doe\nRust engineer"))
            .await
            .unwrap();
        assert_eq!(text, "Jane Doe\nRust engineer");
    }

    #[tokio::test]
    async fn test_blank_text_is_an_error() {
        let err = DocumentTextExtractor
            .extract_text(&doc("resume.txt", None, b"  \n "))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Empty));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_an_error() {
        let err = DocumentTextExtractor
            .extract_text(&doc("resume.pdf", None, b"%PDF-1.4 this is not a pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
    }
}
