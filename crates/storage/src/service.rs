use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::model::FileLogRow;
use crate::{FileAction, FileError, FileLog, FileStore, Result};

/// Audit log of file actions in the `file_logs` table
#[derive(Clone)]
pub struct FileLogRepository {
    pool: SqlitePool,
}

impl FileLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append an entry stamped with the current time
    pub async fn record(&self, filename: &str, action: FileAction) -> Result<()> {
        sqlx::query("INSERT INTO file_logs (filename, action, date) VALUES (?, ?, ?)")
            .bind(filename)
            .bind(action.as_str())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// All entries, oldest first
    pub async fn list(&self) -> Result<Vec<FileLog>> {
        let rows = sqlx::query_as::<_, FileLogRow>(
            "SELECT id, filename, action, date FROM file_logs ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| FileLog::try_from(row).map_err(FileError::from))
            .collect()
    }
}

/// Upload, download and delete files, recording every action in the log
pub struct FileManager {
    store: FileStore,
    logs: FileLogRepository,
}

impl FileManager {
    pub fn new(store: FileStore, logs: FileLogRepository) -> Self {
        Self { store, logs }
    }

    /// Store an uploaded file under its own name
    ///
    /// # Arguments
    /// * `filename` - Name supplied by the client; must be a single path component
    /// * `data` - File contents; empty uploads are rejected
    pub async fn upload(&self, filename: Option<&str>, data: &[u8]) -> Result<()> {
        let filename = provided(filename)?;
        if data.is_empty() {
            return Err(FileError::NotProvided);
        }

        self.store.store(filename, data).await?;
        self.logs.record(filename, FileAction::Uploaded).await?;

        info!(filename, size = data.len(), "file uploaded");
        Ok(())
    }

    pub async fn download(&self, filename: Option<&str>) -> Result<Vec<u8>> {
        let filename = provided(filename)?;

        let data = self.store.retrieve(filename).await?;
        self.logs.record(filename, FileAction::Downloaded).await?;

        info!(filename, "file downloaded");
        Ok(data)
    }

    pub async fn delete(&self, filename: Option<&str>) -> Result<()> {
        let filename = provided(filename)?;

        self.store.delete(filename).await?;
        self.logs.record(filename, FileAction::Deleted).await?;

        info!(filename, "file deleted");
        Ok(())
    }

    pub async fn logs(&self) -> Result<Vec<FileLog>> {
        self.logs.list().await
    }
}

fn provided(filename: Option<&str>) -> Result<&str> {
    match filename {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(FileError::NotProvided),
    }
}
