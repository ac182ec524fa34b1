//! Storage module for file management
//!
//! Provides functionality for:
//! - Uploading files to a local upload directory
//! - Downloading files
//! - Deleting files
//! - An audit log of every file action, persisted in the database

pub mod model;
pub mod service;

pub use model::{FileAction, FileLog};
pub use service::{FileLogRepository, FileManager};

use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("You must provide a filename or a non-empty file")]
    NotProvided,

    #[error("Invalid filename: {0}")]
    InvalidName(String),

    #[error("The file does not exist: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl FileError {
    /// Stable snake_case identifier surfaced to clients.
    pub fn code(&self) -> &'static str {
        match self {
            FileError::NotProvided => "file_not_provided",
            FileError::InvalidName(_) => "invalid_filename",
            FileError::NotFound(_) => "file_not_found",
            FileError::Io(_) => "storage_unavailable",
            FileError::Database(_) => "storage_unavailable",
        }
    }
}

pub type Result<T> = std::result::Result<T, FileError>;

/// Files kept under a single upload directory, addressed by their plain name
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a new file store
    ///
    /// # Arguments
    /// * `base_path` - Upload directory, created if missing
    pub async fn new<P: AsRef<Path>>(base_path: P) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).await?;
        Ok(Self { base_path })
    }

    /// Resolve a client-supplied name to a path inside the upload directory.
    ///
    /// Only a single normal path component is accepted.
    fn resolve(&self, filename: &str) -> Result<PathBuf> {
        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if !filename.contains(['/', '\\']) => {
                Ok(self.base_path.join(name))
            }
            _ => Err(FileError::InvalidName(filename.to_string())),
        }
    }

    /// Write a file, replacing any existing file with the same name
    pub async fn store(&self, filename: &str, data: &[u8]) -> Result<()> {
        let path = self.resolve(filename)?;
        fs::create_dir_all(&self.base_path).await?;

        let mut file = fs::File::create(&path).await?;
        file.write_all(data).await?;
        file.flush().await?;
        Ok(())
    }

    pub async fn retrieve(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.existing(filename).await?;
        Ok(fs::read(&path).await?)
    }

    pub async fn delete(&self, filename: &str) -> Result<()> {
        let path = self.existing(filename).await?;
        fs::remove_file(&path).await?;
        Ok(())
    }

    async fn existing(&self, filename: &str) -> Result<PathBuf> {
        let path = self.resolve(filename)?;
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(FileError::NotFound(filename.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FileError::NotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_and_retrieve() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path()).await.unwrap();

        store.store("test.txt", b"Hello, World!").await.unwrap();

        let retrieved = store.retrieve("test.txt").await.unwrap();
        assert_eq!(retrieved, b"Hello, World!");
    }

    #[tokio::test]
    async fn test_store_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path()).await.unwrap();

        store.store("test.txt", b"first").await.unwrap();
        store.store("test.txt", b"second").await.unwrap();

        assert_eq!(store.retrieve("test.txt").await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path()).await.unwrap();

        store.store("test.txt", b"Test data").await.unwrap();
        assert!(temp_dir.path().join("test.txt").is_file());

        store.delete("test.txt").await.unwrap();
        assert!(!temp_dir.path().join("test.txt").exists());

        let err = store.delete("test.txt").await.unwrap_err();
        assert!(matches!(err, FileError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path()).await.unwrap();

        let err = store.retrieve("nope.bin").await.unwrap_err();
        assert!(matches!(err, FileError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_rejects_paths_outside_upload_dir() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("uploads")).await.unwrap();

        for name in ["../escape.txt", "nested/file.txt", "..", ".", "/etc/passwd", "a\\b", ""] {
            let err = store.store(name, b"x").await.unwrap_err();
            assert!(matches!(err, FileError::InvalidName(_)), "accepted {name:?}");
        }
        assert!(!temp_dir.path().join("escape.txt").exists());
    }

    #[tokio::test]
    async fn test_creates_base_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");

        let store = FileStore::new(&nested).await.unwrap();
        assert!(nested.is_dir());

        store.store("inside.txt", b"x").await.unwrap();
        assert!(nested.join("inside.txt").is_file());
    }
}
