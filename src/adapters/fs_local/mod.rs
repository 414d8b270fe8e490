// Local filesystem adapter - File system operations on the host

use crate::domain::errors::*;
use crate::ports::*;
use async_trait::async_trait;
use std::fs;
use std::path::Path;

/// Local filesystem adapter
#[derive(Debug, Default)]
pub struct LocalFsAdapter;

impl LocalFsAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Self {
        Self
    }

    fn ensure_parent(file_path: &str) -> Result<(), DomainError> {
        if let Some(parent) = Path::new(file_path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    DomainError::FsFail(format!("Failed to create directory {}: {}", parent.display(), e))
                })?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl FsPort for LocalFsAdapter {
    async fn file_exists(&self, file_path: &str) -> Result<bool, DomainError> {
        Ok(Path::new(file_path).is_file())
    }

    async fn copy_file(&self, from: &str, to: &str) -> Result<(), DomainError> {
        Self::ensure_parent(to)?;

        fs::copy(from, to)
            .map_err(|e| DomainError::FsFail(format!("Failed to copy file from {} to {}: {}", from, to, e)))?;
        Ok(())
    }

    async fn delete_file(&self, file_path: &str) -> Result<(), DomainError> {
        fs::remove_file(file_path)
            .map_err(|e| DomainError::FsFail(format!("Failed to delete file {}: {}", file_path, e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_copy_creates_parent_and_delete_removes() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("movie.mkv");
        fs::write(&source, b"container bytes").unwrap();
        let target = dir.path().join("nested").join("copy.mkv");

        let fs_port = LocalFsAdapter::new();
        let source = source.to_str().unwrap();
        let target = target.to_str().unwrap();

        fs_port.copy_file(source, target).await.unwrap();
        assert!(fs_port.file_exists(target).await.unwrap());
        assert_eq!(fs::read(target).unwrap(), b"container bytes");

        fs_port.delete_file(target).await.unwrap();
        assert!(!fs_port.file_exists(target).await.unwrap());
    }

    #[tokio::test]
    async fn test_directories_are_not_files() {
        let dir = TempDir::new().unwrap();
        let fs_port = LocalFsAdapter::new();
        assert!(!fs_port.file_exists(dir.path().to_str().unwrap()).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_file_fails() {
        let fs_port = LocalFsAdapter::new();
        assert!(matches!(
            fs_port.delete_file("/no/such/file.mkv").await,
            Err(DomainError::FsFail(_))
        ));
    }
}
