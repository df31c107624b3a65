//! Line-delimited recipient id file.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use watch_core::error::StoreError;
use watch_core::traits::RecipientStore;
use watch_core::types::RecipientId;

/// Stores one recipient id per line.
#[derive(Debug, Clone)]
pub struct RecipientFile {
    path: PathBuf,
}

impl RecipientFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(contents: &str) -> Result<Vec<RecipientId>, StoreError> {
        let mut ids = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let id = line.parse().map_err(|_| StoreError::Parse {
                line: index + 1,
                content: line.to_string(),
            })?;
            ids.push(id);
        }
        Ok(ids)
    }
}

#[async_trait]
impl RecipientStore for RecipientFile {
    async fn load(&self) -> Result<Vec<RecipientId>, StoreError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No recipient file at {:?}", self.path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let ids = Self::parse(&contents)?;
        info!("Found {} stored chat ids in {:?}", ids.len(), self.path);
        Ok(ids)
    }

    async fn save(&self, recipients: &[RecipientId]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut contents = String::with_capacity(recipients.len() * 12);
        for id in recipients {
            contents.push_str(&id.to_string());
            contents.push('\n');
        }

        // Write then rename so a crash never leaves a truncated file.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, contents).await?;
        fs::rename(&tmp, &self.path).await?;

        info!("Persisted {} ids to {:?}", recipients.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecipientFile::new(dir.path().join("chatIds"));

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecipientFile::new(dir.path().join("data").join("chatIds"));
        let ids = vec![RecipientId(42), RecipientId(-1001), RecipientId(7)];

        store.save(&ids).await.unwrap();
        assert_eq!(store.load().await.unwrap(), ids);

        store.save(&[]).await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chatIds");
        std::fs::write(&path, "1\n\n  \n2\n").unwrap();

        let ids = RecipientFile::new(&path).load().await.unwrap();
        assert_eq!(ids, vec![RecipientId(1), RecipientId(2)]);
    }

    #[tokio::test]
    async fn test_bad_line_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chatIds");
        std::fs::write(&path, "1\nnot-a-number\n").unwrap();

        let err = RecipientFile::new(&path).load().await.unwrap_err();
        assert!(matches!(err, StoreError::Parse { line: 2, .. }));
    }
}
