//! Avatar file storage.
//!
//! Avatars are stored under `avatars/` on a public disk and referenced from
//! contacts by that relative path; [`AvatarStorage::url`] turns the path into
//! a public URL when a contact is rendered.

mod local;
#[cfg(any(test, feature = "mocks"))]
mod memory;

use async_trait::async_trait;

pub use local::LocalAvatarStorage;
#[cfg(any(test, feature = "mocks"))]
pub use memory::InMemoryAvatarStorage;

use crate::OrgbookError;
use crate::crypto::{DEFAULT_TOKEN_LENGTH, generate_token};

/// Directory, relative to the storage root, that holds avatar files.
pub const AVATAR_DIRECTORY: &str = "avatars";

/// A decoded avatar upload.
#[derive(Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for AvatarUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[async_trait]
pub trait AvatarStorage: Send + Sync {
    /// Persists the upload and returns its relative path.
    async fn store(&self, upload: &AvatarUpload) -> Result<String, OrgbookError>;

    /// Removes a stored file. Removing a missing file succeeds.
    async fn delete(&self, path: &str) -> Result<(), OrgbookError>;

    /// Copies a stored file to a fresh path and returns that path.
    async fn copy(&self, path: &str) -> Result<String, OrgbookError>;

    /// Public URL for a stored path.
    fn url(&self, path: &str) -> String;
}

/// File extension used for a stored avatar of the given MIME type.
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}

/// Fresh random path under [`AVATAR_DIRECTORY`] with the given extension.
pub(crate) fn new_avatar_path(extension: &str) -> String {
    format!(
        "{AVATAR_DIRECTORY}/{}.{extension}",
        generate_token(DEFAULT_TOKEN_LENGTH)
    )
}

/// Stored paths must stay inside the avatar directory.
pub(crate) fn check_avatar_path(path: &str) -> Result<(), OrgbookError> {
    let inside = path
        .strip_prefix(AVATAR_DIRECTORY)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|name| !name.is_empty() && !name.contains('/') && !name.contains(".."));
    if inside {
        Ok(())
    } else {
        log::warn!(target: "orgbook::storage", "msg=\"rejected avatar path\", path=\"{path}\"");
        Err(OrgbookError::Storage(format!("invalid avatar path: {path}")))
    }
}

fn extension_of(path: &str) -> &str {
    path.rsplit_once('.').map_or("bin", |(_, ext)| ext)
}

pub(crate) fn join_url(prefix: &str, path: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for() {
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("IMAGE/PNG"), "png");
        assert_eq!(extension_for("application/octet-stream"), "bin");
    }

    #[test]
    fn test_new_avatar_path() {
        let path = new_avatar_path("png");
        assert!(path.starts_with("avatars/"));
        assert!(path.ends_with(".png"));
        assert!(check_avatar_path(&path).is_ok());
        assert_eq!(extension_of(&path), "png");
    }

    #[test]
    fn test_check_avatar_path_rejects_escapes() {
        assert!(check_avatar_path("avatars/../secrets.txt").is_err());
        assert!(check_avatar_path("other/file.png").is_err());
        assert!(check_avatar_path("avatars/").is_err());
        assert!(check_avatar_path("avatars/nested/file.png").is_err());
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("/storage/", "avatars/a.png"), "/storage/avatars/a.png");
        assert_eq!(
            join_url("https://cdn.example.com", "avatars/a.png"),
            "https://cdn.example.com/avatars/a.png"
        );
    }
}
