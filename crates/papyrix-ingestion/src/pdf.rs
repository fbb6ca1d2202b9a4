//! PDF text extraction via lopdf.
//!
//! Pages are visited in order; pages yielding no machine-readable text are
//! skipped. The concatenated document text carries no page separators, but
//! the per-page texts are kept for citation attribution.

use lopdf::Document as PdfDoc;
use std::path::Path;
use tracing::{debug, warn};

use crate::{IngestError, Result};

/// Text content of a single page.
#[derive(Debug, Clone)]
pub struct PageText {
    /// 1-based page number.
    pub number: u32,
    pub text: String,
}

/// Extraction result: the full document text plus the per-page breakdown.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub full_text: String,
    pub pages: Vec<PageText>,
    pub page_count: usize,
}

/// Extract text from a PDF on disk. Fails with [`IngestError::FileNotFound`]
/// before attempting to parse when the path does not exist.
pub fn extract_from_path(path: &Path) -> Result<ExtractedDocument> {
    if !path.exists() {
        return Err(IngestError::FileNotFound(path.display().to_string()));
    }
    let pdf = PdfDoc::load(path)?;
    Ok(extract_pages(&pdf))
}

/// Extract text from an in-memory PDF, e.g. an HTTP upload.
pub fn extract_from_bytes(bytes: &[u8]) -> Result<ExtractedDocument> {
    let pdf = PdfDoc::load_mem(bytes)?;
    Ok(extract_pages(&pdf))
}

fn extract_pages(pdf: &PdfDoc) -> ExtractedDocument {
    let page_map = pdf.get_pages();
    let page_count = page_map.len();

    let mut full_text = String::new();
    let mut pages = Vec::new();

    for number in page_map.keys() {
        let page_text = match pdf.extract_text(&[*number]) {
            Ok(text) => text,
            Err(e) => {
                warn!(page = number, "Text extraction failed for page: {e}");
                continue;
            }
        };
        if page_text.trim().is_empty() {
            continue;
        }
        full_text.push_str(&page_text);
        pages.push(PageText { number: *number, text: page_text });
    }

    debug!(
        pages = page_count,
        with_text = pages.len(),
        chars = full_text.len(),
        "PDF extraction complete"
    );

    ExtractedDocument { full_text, pages, page_count }
}
