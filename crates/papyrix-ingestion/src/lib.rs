//! papyrix-ingestion — PDF text extraction and citation-pattern scanning.

mod citations;
mod pdf;

pub use citations::{extract_citations, format_citation_list, Citation, NO_CITATIONS_FOUND};
pub use pdf::{extract_from_bytes, extract_from_path, ExtractedDocument, PageText};

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("PDF parse error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
