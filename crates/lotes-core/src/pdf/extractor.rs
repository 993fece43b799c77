//! PDF text extraction using lopdf and pdf-extract.

use std::borrow::Cow;

use lopdf::Document;
use tracing::{debug, trace};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF text extractor.
///
/// lopdf opens (and if needed decrypts) the document; pdf-extract recovers
/// the text page by page.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Bytes of a copy of the document holding only its first `limit`
    /// pages (0 = all pages).
    fn leading_pages_data(&self, limit: u32) -> Result<Cow<'_, [u8]>> {
        let doc = self
            .document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))?;

        let page_count = doc.get_pages().len() as u32;
        if limit == 0 || limit >= page_count {
            return Ok(Cow::Borrowed(self.raw_data.as_slice()));
        }

        let mut truncated = doc.clone();
        let trailing: Vec<u32> = (limit + 1..=page_count).collect();
        truncated.delete_pages(&trailing);

        let mut data = Vec::new();
        truncated
            .save_to(&mut data)
            .map_err(|e| PdfError::Parse(format!("Failed to save truncated PDF: {}", e)))?;

        trace!("Truncated PDF from {} to {} pages", page_count, limit);
        Ok(Cow::Owned(data))
    }

    /// Text of the first `limit` pages (0 = all pages), in order.
    fn pages(&self, limit: u32) -> Result<Vec<String>> {
        let data = self.leading_pages_data(limit)?;

        let pages = pdf_extract::extract_text_from_mem_by_pages(&data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        trace!("Recovered text for {} pages", pages.len());
        Ok(pages)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // Save decrypted document to raw_data for pdf_extract
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        self.extract_leading_text(0)
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }

        self.pages(page)?
            .pop()
            .ok_or(PdfError::InvalidPage(page))
    }

    fn extract_leading_text(&self, max_pages: usize) -> Result<String> {
        let limit = u32::try_from(max_pages).unwrap_or(u32::MAX);
        let pages = self.pages(limit)?;

        let mut text = String::new();
        for page in &pages {
            text.push_str(page);
            text.push('\n');
        }

        debug!(
            "Extracted {} chars from {} of {} pages",
            text.len(),
            pages.len(),
            self.page_count()
        );
        Ok(text.trim().to_string())
    }
}
