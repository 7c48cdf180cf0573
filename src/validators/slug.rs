use std::sync::LazyLock;

use regex::Regex;

use super::ValidationError;
use super::name::MAX_NAME_LENGTH;

#[allow(clippy::unwrap_used)]
static SLUG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9_-]+$").unwrap());

/// Lowercases and collapses every run of characters outside `[a-z0-9_]` into
/// a single `-`, trimming dashes at both ends.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.trim().chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() {
        return Err(ValidationError::Required);
    }
    if slug.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            max: MAX_NAME_LENGTH,
        });
    }
    if !SLUG_REGEX.is_match(slug) {
        return Err(ValidationError::SlugInvalid);
    }
    Ok(())
}
