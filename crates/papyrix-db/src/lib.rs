//! papyrix-db — LanceDB document store.
//!
//! Write-only in this service: the CLI inserts the extracted document with
//! its summary as metadata, and nothing reads it back.

mod database;
mod documents;

pub use database::Database;
pub use documents::{DocumentRecord, DocumentRepository, DOCUMENT_ID};

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("LanceDB error: {0}")]
    LanceDb(String),

    #[error("Arrow error: {0}")]
    Arrow(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lancedb::Error> for DbError {
    fn from(err: lancedb::Error) -> Self {
        DbError::LanceDb(err.to_string())
    }
}

impl From<arrow_schema::ArrowError> for DbError {
    fn from(err: arrow_schema::ArrowError) -> Self {
        DbError::Arrow(err.to_string())
    }
}
