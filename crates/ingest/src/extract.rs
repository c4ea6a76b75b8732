use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Document is empty")]
    Empty,
    #[error("PDF text extraction failed: {0}")]
    Pdf(String),
    #[error("PDF documents are not supported by this build (enable the `pdf` feature)")]
    PdfNotAvailable,
}

/// Turns an uploaded document into plain statement text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
}

/// Reads the document as UTF-8, replacing invalid sequences.
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf8Extractor;

impl TextExtractor for Utf8Extractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        if bytes.is_empty() {
            return Err(ExtractError::Empty);
        }
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

#[cfg(feature = "pdf")]
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

#[cfg(feature = "pdf")]
impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        if bytes.is_empty() {
            return Err(ExtractError::Empty);
        }
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
    }
}

/// Sniffs the content: PDFs go to the PDF extractor when it is built in, everything else is
/// read as text.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoExtractor;

impl TextExtractor for AutoExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        if is_pdf(bytes) {
            #[cfg(feature = "pdf")]
            return PdfExtractor.extract(bytes);
            #[cfg(not(feature = "pdf"))]
            return Err(ExtractError::PdfNotAvailable);
        }
        Utf8Extractor.extract(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_passthrough() {
        let text = Utf8Extractor.extract(b"05 Jan Coffee 4.50").unwrap();
        assert_eq!(text, "05 Jan Coffee 4.50");
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let text = Utf8Extractor.extract(&[b'o', b'k', 0xff, b'!']).unwrap();
        assert!(text.starts_with("ok"));
        assert!(text.ends_with('!'));
    }

    #[test]
    fn empty_document_is_an_error() {
        assert!(matches!(Utf8Extractor.extract(b""), Err(ExtractError::Empty)));
        assert!(matches!(AutoExtractor.extract(b""), Err(ExtractError::Empty)));
    }

    #[test]
    fn auto_reads_text_as_text() {
        assert_eq!(AutoExtractor.extract(b"hello").unwrap(), "hello");
    }

    #[cfg(not(feature = "pdf"))]
    #[test]
    fn auto_rejects_pdf_without_feature() {
        let err = AutoExtractor.extract(b"%PDF-1.7\n...").unwrap_err();
        assert!(matches!(err, ExtractError::PdfNotAvailable));
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn garbage_pdf_is_an_extraction_error() {
        let err = AutoExtractor.extract(b"%PDF-1.7 not really").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}
