//! Flowbit Ingest — file format detection and text extraction.
//!
//! Extraction is best-effort: any I/O or decode failure is logged and
//! degrades to an empty string. Callers treat empty text as "nothing to
//! classify" rather than an error.

use std::path::Path;

use tracing::warn;

use flowbit_core::DocumentFormat;

/// Extract raw text from a file according to its detected format.
///
/// JSON files return empty text here; the JSON extraction agent reads the
/// structured content itself.
pub fn extract_text(path: &Path, format: DocumentFormat) -> String {
    match format {
        DocumentFormat::Pdf => extract_pdf_text(path),
        DocumentFormat::Email => extract_plain_text(path),
        DocumentFormat::Json | DocumentFormat::Unknown => String::new(),
    }
}

/// Extract text from a PDF, concatenating per-page text in document order.
/// Unreadable or corrupt PDFs yield an empty string.
pub fn extract_pdf_text(path: &Path) -> String {
    match pdf_extract::extract_text(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("PDF extraction failed for {}: {}", path.display(), e);
            String::new()
        }
    }
}

/// Read a plain-text or email file as UTF-8. Failures yield an empty string.
pub fn extract_plain_text(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Text extraction failed for {}: {}", path.display(), e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_plain_text_reads_whole_file() {
        let mut file = tempfile::NamedTempFile::with_suffix(".txt").unwrap();
        write!(file, "Dear team,\n\nPlease quote 40 units.").unwrap();

        let text = extract_plain_text(file.path());
        assert!(text.starts_with("Dear team,"));
        assert!(text.contains("40 units"));
    }

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let text = extract_plain_text(Path::new("/nonexistent/mail.txt"));
        assert_eq!(text, "");
    }

    #[test]
    fn test_corrupt_pdf_degrades_to_empty() {
        let mut file = tempfile::NamedTempFile::with_suffix(".pdf").unwrap();
        file.write_all(b"%PDF-1.4 garbage, not a real document").unwrap();

        let text = extract_pdf_text(file.path());
        assert_eq!(text, "");
    }

    #[test]
    fn test_json_format_skips_extraction() {
        let mut file = tempfile::NamedTempFile::with_suffix(".json").unwrap();
        write!(file, r#"{{"invoice_number": "INV-1"}}"#).unwrap();

        let text = extract_text(file.path(), DocumentFormat::Json);
        assert_eq!(text, "");
    }
}
