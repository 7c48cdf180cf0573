use chrono::Duration;

use crate::SecretString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    None,
    #[default]
    Lax,
    Strict,
}

impl SameSite {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Lax => "Lax",
            Self::Strict => "Strict",
        }
    }
}

/// Session cookie settings and the HMAC signing key.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub cookie_path: String,
    pub cookie_domain: Option<String>,
    pub cookie_secure: bool,
    pub cookie_http_only: bool,
    pub cookie_same_site: SameSite,
    /// Sessions slide: every authenticated request pushes expiry this far out.
    pub session_lifetime: Duration,
    pub secret_key: SecretString,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "orgbook_session".to_owned(),
            cookie_path: "/".to_owned(),
            cookie_domain: None,
            cookie_secure: true,
            cookie_http_only: true,
            cookie_same_site: SameSite::Lax,
            session_lifetime: Duration::hours(2),
            secret_key: SecretString::new(""),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.secret_key.is_empty() {
            return Err("session secret_key must not be empty");
        }
        if self.secret_key.len() < 32 {
            return Err("session secret_key should be at least 32 bytes");
        }
        if self.cookie_same_site == SameSite::None && !self.cookie_secure {
            return Err("SameSite=None cookies must be secure");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.cookie_name, "orgbook_session");
        assert!(config.cookie_secure);
        assert!(config.cookie_http_only);
        assert_eq!(config.cookie_same_site, SameSite::Lax);
    }

    #[test]
    fn test_validate_secret() {
        assert!(SessionConfig::default().validate().is_err());

        let short = SessionConfig {
            secret_key: SecretString::new("short"),
            ..Default::default()
        };
        assert!(short.validate().is_err());

        let valid = SessionConfig {
            secret_key: SecretString::new("this-is-a-very-long-secret-key-for-testing"),
            ..Default::default()
        };
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn test_same_site_none_requires_secure() {
        let config = SessionConfig {
            secret_key: SecretString::new("this-is-a-very-long-secret-key-for-testing"),
            cookie_same_site: SameSite::None,
            cookie_secure: false,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
