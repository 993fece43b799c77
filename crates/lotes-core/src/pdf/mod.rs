//! PDF text recovery.

mod extractor;

pub use extractor::PdfExtractor;

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;

    /// Extract text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;

    /// Extract the text of the first `max_pages` pages (0 = all pages).
    ///
    /// Each page is followed by a newline and the result is trimmed.
    fn extract_leading_text(&self, max_pages: usize) -> Result<String>;
}

/// Read the PDF at `path` and return the text of its first `max_pages`
/// pages (0 = all pages).
pub fn read_leading_text(path: &Path, max_pages: usize) -> crate::Result<String> {
    let data = fs::read(path)?;
    let mut extractor = PdfExtractor::new();
    extractor.load(&data)?;

    debug!(
        "{} has {} pages, reading up to {}",
        path.display(),
        extractor.page_count(),
        max_pages
    );

    Ok(extractor.extract_leading_text(max_pages)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LotesError;
    use tempfile::TempDir;

    #[test]
    fn test_read_leading_text_errors() {
        let dir = TempDir::new().unwrap();

        let missing = read_leading_text(&dir.path().join("missing.pdf"), 3).unwrap_err();
        assert!(matches!(missing, LotesError::Io(_)));

        let garbage = dir.path().join("garbage.pdf");
        fs::write(&garbage, b"not a pdf").unwrap();
        let err = read_leading_text(&garbage, 3).unwrap_err();
        assert!(matches!(err, LotesError::Pdf(PdfError::Parse(_))));
    }
}
