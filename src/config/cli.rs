use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Filesystem storage. Relative paths resolve against `base_path`;
/// absolute paths are used as given.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        let data = tokio::fs::read(&full_path).await.map_err(|e| {
            std::io::Error::new(e.kind(), format!("{}: {}", full_path.display(), e))
        })?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&full_path, data).await?;
        Ok(())
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(Path::new("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.write_file("nested/out.csv", b"a,b\n").await.unwrap();

        assert_eq!(storage.read_file("nested/out.csv").await.unwrap(), b"a,b\n");
    }

    #[tokio::test]
    async fn test_read_missing_file_names_path() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        let err = storage.read_file("missing.csv").await.unwrap_err();

        assert!(err.to_string().contains("missing.csv"));
    }
}
