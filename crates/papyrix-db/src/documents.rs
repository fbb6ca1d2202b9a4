//! Document repository: insert-only access to the documents table.

use arrow_array::{Array, RecordBatch, RecordBatchIterator, StringArray};
use arrow_schema::{DataType, Field, Schema};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use crate::database::{Database, TABLE_DOCUMENTS};
use crate::Result;

/// Identifier for the single document this demo stores.
pub const DOCUMENT_ID: &str = "doc_1";

/// One stored document: the full extracted text with its summary as metadata.
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    pub id: String,
    pub content: String,
    pub summary: String,
    pub ingested_at: DateTime<Utc>,
}

impl DocumentRecord {
    pub fn new(content: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: DOCUMENT_ID.to_string(),
            content: content.into(),
            summary: summary.into(),
            ingested_at: Utc::now(),
        }
    }
}

#[derive(Clone)]
pub struct DocumentRepository {
    db: Database,
}

impl DocumentRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a document. Nothing in this service queries it back.
    pub async fn insert(&self, record: &DocumentRecord) -> Result<()> {
        let table = self
            .db
            .connection()
            .open_table(TABLE_DOCUMENTS)
            .execute()
            .await?;

        let batch = document_to_record(record)?;
        let schema = batch.schema();
        let iter = RecordBatchIterator::new(vec![Ok(batch)], schema);

        table.add(iter).execute().await?;
        info!(id = %record.id, chars = record.content.len(), "Document inserted");
        Ok(())
    }

    pub async fn count(&self) -> Result<usize> {
        let table = self
            .db
            .connection()
            .open_table(TABLE_DOCUMENTS)
            .execute()
            .await?;
        Ok(table.count_rows(None).await?)
    }
}

fn document_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("content", DataType::Utf8, false),
        Field::new("summary", DataType::Utf8, true),
        Field::new("ingested_at", DataType::Utf8, false),
    ]))
}

fn document_to_record(record: &DocumentRecord) -> Result<RecordBatch> {
    let schema = document_schema();

    let id = StringArray::from(vec![record.id.as_str()]);
    let content = StringArray::from(vec![record.content.as_str()]);
    let summary = StringArray::from(vec![record.summary.as_str()]);
    let ingested_at = StringArray::from(vec![record.ingested_at.to_rfc3339()]);

    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(id) as Arc<dyn Array>,
            Arc::new(content),
            Arc::new(summary),
            Arc::new(ingested_at),
        ],
    )?;
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_into_fresh_database_counts_one_row() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("store")).await.unwrap();
        db.initialize().await.unwrap();

        let repo = DocumentRepository::new(db);
        let record = DocumentRecord::new("full document text", "its summary");
        repo.insert(&record).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("store")).await.unwrap();
        db.initialize().await.unwrap();
        db.initialize().await.unwrap();
        assert!(db.table_exists(TABLE_DOCUMENTS).await.unwrap());
    }

    #[test]
    fn record_uses_fixed_document_id() {
        let record = DocumentRecord::new("text", "summary");
        assert_eq!(record.id, DOCUMENT_ID);
    }
}
