use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use super::{
    AVATAR_DIRECTORY, AvatarStorage, AvatarUpload, check_avatar_path, extension_for,
    extension_of, join_url, new_avatar_path,
};
use crate::OrgbookError;
use crate::config::StorageConfig;

/// Avatar storage on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalAvatarStorage {
    root: PathBuf,
    public_url_prefix: String,
}

impl LocalAvatarStorage {
    pub fn new(root: impl Into<PathBuf>, public_url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url_prefix: public_url_prefix.into(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.root.clone(), config.public_url_prefix.clone())
    }

    fn full_path(&self, path: &str) -> Result<PathBuf, OrgbookError> {
        check_avatar_path(path)?;
        Ok(self.root.join(path))
    }

    async fn write(&self, path: &str, bytes: &[u8]) -> Result<(), OrgbookError> {
        let full = self.full_path(path)?;
        tokio::fs::create_dir_all(self.root.join(AVATAR_DIRECTORY))
            .await
            .map_err(|e| storage_error("create_dir", path, &e))?;
        tokio::fs::write(&full, bytes)
            .await
            .map_err(|e| storage_error("write", path, &e))
    }
}

fn storage_error(operation: &str, path: &str, e: &std::io::Error) -> OrgbookError {
    log::error!(target: "orgbook::storage", "msg=\"storage error\", operation=\"{operation}\", path=\"{path}\", error=\"{e}\"");
    OrgbookError::Storage(e.to_string())
}

#[async_trait]
impl AvatarStorage for LocalAvatarStorage {
    async fn store(&self, upload: &AvatarUpload) -> Result<String, OrgbookError> {
        let path = new_avatar_path(extension_for(&upload.content_type));
        self.write(&path, &upload.bytes).await?;
        log::debug!(target: "orgbook::storage", "msg=\"avatar stored\", path=\"{path}\", bytes={}", upload.bytes.len());
        Ok(path)
    }

    async fn delete(&self, path: &str) -> Result<(), OrgbookError> {
        let full = self.full_path(path)?;
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("delete", path, &e)),
        }
    }

    async fn copy(&self, path: &str) -> Result<String, OrgbookError> {
        let source = self.full_path(path)?;
        let bytes = tokio::fs::read(&source)
            .await
            .map_err(|e| storage_error("read", path, &e))?;
        let target = new_avatar_path(extension_of(path));
        self.write(&target, &bytes).await?;
        Ok(target)
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.public_url_prefix, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(bytes: &[u8]) -> AvatarUpload {
        AvatarUpload {
            file_name: "face.png".to_owned(),
            content_type: "image/png".to_owned(),
            bytes: bytes.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_store_copy_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalAvatarStorage::new(dir.path(), "/storage");

        let path = storage.store(&png(b"\x89PNG one")).await.unwrap();
        assert!(dir.path().join(&path).exists());
        assert_eq!(storage.url(&path), format!("/storage/{path}"));

        let copy = storage.copy(&path).await.unwrap();
        assert_ne!(copy, path);
        assert!(copy.ends_with(".png"));
        assert_eq!(
            std::fs::read(dir.path().join(&copy)).unwrap(),
            b"\x89PNG one".to_vec()
        );

        storage.delete(&path).await.unwrap();
        assert!(!dir.path().join(&path).exists());
        assert!(dir.path().join(&copy).exists());

        // already gone
        storage.delete(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_copy_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalAvatarStorage::new(dir.path(), "/storage");

        let result = storage.copy("avatars/missing.png").await;
        assert!(matches!(result, Err(OrgbookError::Storage(_))));
    }

    #[tokio::test]
    async fn test_rejects_path_outside_avatar_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalAvatarStorage::new(dir.path(), "/storage");

        assert!(storage.delete("../etc/passwd").await.is_err());
    }
}
