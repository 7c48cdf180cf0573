use super::ValidationError;

const MAX_PHONE_LENGTH: usize = 20;

/// Phone numbers are free text, capped at 20 characters.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.chars().count() > MAX_PHONE_LENGTH {
        return Err(ValidationError::TooLong {
            max: MAX_PHONE_LENGTH,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_length() {
        assert!(validate_phone("+1 (555) 010-0199").is_ok());
        assert_eq!(
            validate_phone("+1 555 0100 0199 ext 42").unwrap_err(),
            ValidationError::TooLong { max: 20 }
        );
    }
}
