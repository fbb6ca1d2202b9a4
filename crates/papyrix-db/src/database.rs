//! Database connection and table management.

use arrow_array::RecordBatchIterator;
use arrow_schema::{DataType, Field, Fields, Schema};
use lancedb::connection::Connection;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::Result;

pub const TABLE_DOCUMENTS: &str = "documents";

/// LanceDB handle.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
    path: String,
}

impl Database {
    /// Open or create a database at the specified path.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        if !path.as_ref().exists() {
            std::fs::create_dir_all(path.as_ref())?;
        }

        let conn = lancedb::connect(&path_str).execute().await?;
        debug!(path = %path_str, "Opened LanceDB database");

        Ok(Self { conn, path: path_str })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Create the documents table when missing. LanceDB needs a schema-bearing
    /// (empty) batch iterator to create a table.
    pub async fn initialize(&self) -> Result<()> {
        if !self.table_exists(TABLE_DOCUMENTS).await? {
            self.create_documents_table().await?;
        }
        Ok(())
    }

    pub async fn table_exists(&self, name: &str) -> Result<bool> {
        let tables = self.conn.table_names().execute().await?;
        Ok(tables.contains(&name.to_string()))
    }

    async fn create_documents_table(&self) -> Result<()> {
        let fields: Fields = vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("content", DataType::Utf8, false),
            Field::new("summary", DataType::Utf8, true),
            Field::new("ingested_at", DataType::Utf8, false),
        ]
        .into();

        let schema = Arc::new(Schema::new(fields));
        let empty_iter = RecordBatchIterator::new(vec![], schema);

        self.conn
            .create_table(TABLE_DOCUMENTS, empty_iter)
            .execute()
            .await?;

        Ok(())
    }
}
