use super::ValidationError;
use crate::config::ContactLimits;
use crate::storage::AvatarUpload;

const IMAGE_SIGNATURES: &[(&[u8], &str)] = &[
    (&[0xFF, 0xD8, 0xFF], "image/jpeg"),
    (&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A], "image/png"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"BM", "image/bmp"),
];

/// Checks the declared MIME type, the decoded size and the leading bytes of an
/// avatar upload. The content must match the declared type.
pub fn validate_avatar(upload: &AvatarUpload, limits: &ContactLimits) -> Result<(), ValidationError> {
    let content_type = upload.content_type.to_ascii_lowercase();
    if !limits
        .allowed_avatar_types
        .iter()
        .any(|allowed| *allowed == content_type)
    {
        return Err(ValidationError::AvatarNotImage);
    }

    if upload.bytes.is_empty() {
        return Err(ValidationError::AvatarUnreadable);
    }

    if upload.bytes.len() > limits.max_avatar_bytes {
        return Err(ValidationError::AvatarTooLarge {
            max_kilobytes: limits.max_avatar_bytes / 1024,
        });
    }

    let declared = match content_type.as_str() {
        "image/jpg" | "image/pjpeg" => "image/jpeg",
        other => other,
    };
    if detect_image_type(&upload.bytes) != Some(declared) {
        return Err(ValidationError::AvatarNotImage);
    }

    Ok(())
}

fn detect_image_type(data: &[u8]) -> Option<&'static str> {
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    IMAGE_SIGNATURES
        .iter()
        .find(|(magic, _)| data.starts_with(magic))
        .map(|(_, mime_type)| *mime_type)
}
