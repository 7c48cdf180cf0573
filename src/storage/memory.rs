use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::{
    AvatarStorage, AvatarUpload, check_avatar_path, extension_for, extension_of, join_url,
    new_avatar_path,
};
use crate::OrgbookError;

/// Avatar storage held in memory, for tests.
#[derive(Clone)]
pub struct InMemoryAvatarStorage {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    public_url_prefix: String,
}

impl InMemoryAvatarStorage {
    pub fn new() -> Self {
        Self {
            files: Arc::new(RwLock::new(HashMap::new())),
            public_url_prefix: "/storage".to_owned(),
        }
    }

    pub fn exists(&self, path: &str) -> bool {
        self.files
            .read()
            .map(|files| files.contains_key(path))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.files.read().map(|files| files.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryAvatarStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AvatarStorage for InMemoryAvatarStorage {
    async fn store(&self, upload: &AvatarUpload) -> Result<String, OrgbookError> {
        let path = new_avatar_path(extension_for(&upload.content_type));
        self.files
            .write()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?
            .insert(path.clone(), upload.bytes.clone());
        Ok(path)
    }

    async fn delete(&self, path: &str) -> Result<(), OrgbookError> {
        check_avatar_path(path)?;
        self.files
            .write()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?
            .remove(path);
        Ok(())
    }

    async fn copy(&self, path: &str) -> Result<String, OrgbookError> {
        check_avatar_path(path)?;
        let mut files = self
            .files
            .write()
            .map_err(|_| OrgbookError::Internal("lock poisoned".into()))?;
        let bytes = files
            .get(path)
            .cloned()
            .ok_or_else(|| OrgbookError::Storage(format!("no such file: {path}")))?;
        let target = new_avatar_path(extension_of(path));
        files.insert(target.clone(), bytes);
        Ok(target)
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.public_url_prefix, path)
    }
}
