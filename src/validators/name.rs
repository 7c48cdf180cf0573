use super::ValidationError;

/// Upper bound for names of people, contacts and organizations.
pub const MAX_NAME_LENGTH: usize = 255;

/// Required, non-blank, at most `max` characters.
pub fn validate_name(name: &str, max: usize) -> Result<(), ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Required);
    }

    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { max });
    }

    Ok(())
}

/// Length check for optional free-text values.
pub fn validate_optional_length(value: Option<&str>, max: usize) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.chars().count() > max => Err(ValidationError::TooLong { max }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_name("Jane", MAX_NAME_LENGTH).is_ok());
        assert!(validate_name("José García", MAX_NAME_LENGTH).is_ok());
        assert!(validate_name("名前", MAX_NAME_LENGTH).is_ok());
    }

    #[test]
    fn test_name_required() {
        assert_eq!(validate_name("", MAX_NAME_LENGTH).unwrap_err(), ValidationError::Required);
        assert_eq!(validate_name("  ", MAX_NAME_LENGTH).unwrap_err(), ValidationError::Required);
    }

    #[test]
    fn test_name_too_long() {
        let name = "a".repeat(256);
        assert_eq!(
            validate_name(&name, MAX_NAME_LENGTH).unwrap_err(),
            ValidationError::TooLong { max: 255 }
        );
        // counted in characters, not bytes
        assert!(validate_name(&"é".repeat(255), MAX_NAME_LENGTH).is_ok());
    }

    #[test]
    fn test_optional_length() {
        assert!(validate_optional_length(None, 3).is_ok());
        assert!(validate_optional_length(Some("abc"), 3).is_ok());
        assert_eq!(
            validate_optional_length(Some("abcd"), 3).unwrap_err(),
            ValidationError::TooLong { max: 3 }
        );
    }
}
