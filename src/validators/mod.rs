//! Input validators and the field-level error map returned on 422.

mod avatar;
mod email;
mod name;
mod password;
mod phone;
mod slug;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

pub use avatar::validate_avatar;
pub use email::validate_email;
pub use name::{MAX_NAME_LENGTH, validate_name, validate_optional_length};
pub use password::{MIN_PASSWORD_LENGTH, validate_password};
pub use phone::validate_phone;
pub use slug::{slugify, validate_slug};

use crate::OrgbookError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Required,
    TooLong { max: usize },
    TooShort { min: usize },
    EmailInvalidFormat,
    SlugInvalid,
    RoleInvalid,
    TooManyCustomFields { max: usize },
    AvatarNotImage,
    AvatarTooLarge { max_kilobytes: usize },
    AvatarUnreadable,
    Taken,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "is required"),
            Self::TooLong { max } => write!(f, "may not be greater than {max} characters"),
            Self::TooShort { min } => write!(f, "must be at least {min} characters"),
            Self::EmailInvalidFormat => write!(f, "must be a valid email address"),
            Self::SlugInvalid => {
                write!(f, "may only contain letters, numbers, dashes and underscores")
            }
            Self::RoleInvalid => write!(f, "must be one of: admin, member"),
            Self::TooManyCustomFields { max } => {
                write!(f, "may not have more than {max} entries")
            }
            Self::AvatarNotImage => write!(f, "must be an image (jpeg, png, gif or webp)"),
            Self::AvatarTooLarge { max_kilobytes } => {
                write!(f, "may not be greater than {max_kilobytes} kilobytes")
            }
            Self::AvatarUnreadable => write!(f, "could not be decoded"),
            Self::Taken => write!(f, "has already been taken"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validation messages keyed by field name.
///
/// Serializes as `{ "field": ["message", ...] }` with fields in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// Records the error of a validator result, if any.
    pub fn check(&mut self, field: &str, result: Result<(), ValidationError>) {
        if let Err(err) = result {
            self.add(field, err.to_string());
        }
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `Ok(())` when nothing was recorded, otherwise `OrgbookError::Validation`.
    pub fn into_result(self) -> Result<(), OrgbookError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(OrgbookError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field} {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}
