use crate::validators::{
    FieldErrors, MAX_NAME_LENGTH, ValidationError, validate_email, validate_name,
    validate_password,
};
use crate::{GlobalRole, OrgbookError, Role};

/// User form input for global administration.
#[derive(Debug, Clone, Default)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    /// Required on create; `None` or blank keeps the current password on update.
    pub password: Option<String>,
    /// `admin` or `member`; defaults to `member`.
    pub global_role: Option<String>,
}

pub(crate) struct ValidUser {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub global_role: GlobalRole,
}

impl UserInput {
    pub(crate) fn validate(self, password_required: bool) -> Result<ValidUser, OrgbookError> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim().to_owned();
        errors.check("name", validate_name(&name, MAX_NAME_LENGTH));

        let email = self.email.trim().to_owned();
        errors.check("email", validate_email(&email));

        let password = self.password.filter(|p| !p.is_empty());
        match password.as_deref() {
            Some(p) => errors.check("password", validate_password(p)),
            None if password_required => {
                errors.add("password", ValidationError::Required.to_string());
            }
            None => {}
        }

        let global_role = match self.global_role.as_deref().map(str::trim) {
            None | Some("") => GlobalRole::Member,
            Some(role) => GlobalRole::from_str(role).unwrap_or_else(|| {
                errors.add("global_role", ValidationError::RoleInvalid.to_string());
                GlobalRole::Member
            }),
        };

        errors.into_result()?;

        Ok(ValidUser {
            name,
            email,
            password,
            global_role,
        })
    }
}
