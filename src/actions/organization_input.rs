use crate::validators::{FieldErrors, MAX_NAME_LENGTH, slugify, validate_name, validate_slug};
use crate::OrgbookError;

/// Name and slug as submitted on the create and edit forms.
#[derive(Debug, Clone, Default)]
pub struct OrganizationInput {
    pub name: String,
    pub slug: String,
}

impl OrganizationInput {
    /// Returns the trimmed name and the normalized slug.
    pub(crate) fn validate(&self) -> Result<(String, String), OrgbookError> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim().to_owned();
        errors.check("name", validate_name(&name, MAX_NAME_LENGTH));

        let slug = slugify(&self.slug);
        errors.check("slug", validate_slug(&slug));

        errors.into_result()?;
        Ok((name, slug))
    }
}
