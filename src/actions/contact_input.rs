use crate::config::ContactLimits;
use crate::storage::AvatarUpload;
use crate::validators::{
    FieldErrors, MAX_NAME_LENGTH, ValidationError, validate_avatar, validate_email, validate_name,
    validate_optional_length, validate_phone,
};
use crate::{MetaFields, OrgbookError};

/// Raw contact form input, as submitted for create and update.
#[derive(Debug, Clone, Default)]
pub struct ContactInput {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<AvatarUpload>,
    /// Clears the stored avatar on update. A new upload takes precedence.
    pub remove_avatar: bool,
    pub notes: Vec<String>,
    pub custom_fields: Vec<(String, String)>,
}

/// Input that passed validation, with blanks normalized away.
#[derive(Debug, Clone)]
pub struct ValidContact {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<AvatarUpload>,
    pub remove_avatar: bool,
    pub notes: Vec<String>,
    pub meta: MetaFields,
}

impl ContactInput {
    /// Trims every value, turns blank email and phone into `None`, drops
    /// blank notes and collects every failure into one field error map.
    ///
    /// # Errors
    ///
    /// Returns `OrgbookError::Validation` keyed by form field.
    pub fn validate(self, limits: &ContactLimits) -> Result<ValidContact, OrgbookError> {
        let mut errors = FieldErrors::new();

        let first_name = self.first_name.trim().to_owned();
        let last_name = self.last_name.trim().to_owned();
        errors.check("first_name", validate_name(&first_name, MAX_NAME_LENGTH));
        errors.check("last_name", validate_name(&last_name, MAX_NAME_LENGTH));

        let email = non_blank(self.email);
        if let Some(email) = email.as_deref() {
            errors.check("email", validate_email(email));
        }

        let phone = non_blank(self.phone);
        errors.check("phone", phone.as_deref().map_or(Ok(()), validate_phone));

        if let Some(avatar) = self.avatar.as_ref() {
            errors.check("avatar", validate_avatar(avatar, limits));
        }

        let notes: Vec<String> = self
            .notes
            .into_iter()
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty())
            .collect();
        for (index, note) in notes.iter().enumerate() {
            errors.check(
                &format!("notes.{index}"),
                validate_optional_length(Some(note), limits.max_note_length),
            );
        }

        let meta = match MetaFields::from_pairs(self.custom_fields, limits.max_custom_fields) {
            Ok(meta) => meta,
            Err(e) => {
                errors.add("custom_fields", e.to_string());
                MetaFields::new()
            }
        };

        errors.into_result()?;

        Ok(ValidContact {
            first_name,
            last_name,
            email,
            phone,
            avatar: self.avatar,
            remove_avatar: self.remove_avatar,
            notes,
            meta,
        })
    }
}

/// Validates a single note body for the add-note path.
pub(crate) fn validate_note(body: &str, limits: &ContactLimits) -> Result<String, OrgbookError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(OrgbookError::field("body", ValidationError::Required.to_string()));
    }
    if body.chars().count() > limits.max_note_length {
        return Err(OrgbookError::field(
            "body",
            ValidationError::TooLong {
                max: limits.max_note_length,
            }
            .to_string(),
        ));
    }
    Ok(body.to_owned())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
