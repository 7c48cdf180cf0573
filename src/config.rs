//! Application configuration.
//!
//! ```rust
//! use orgbook::config::{ContactLimits, OrgbookConfig};
//!
//! let config = OrgbookConfig {
//!     contacts: ContactLimits {
//!         max_custom_fields: 10,
//!         ..Default::default()
//!     },
//!     ..OrgbookConfig::development()
//! };
//! assert_eq!(config.contacts.max_custom_fields, 10);
//! ```

use std::path::PathBuf;

use chrono::Duration;

use crate::crypto::Argon2Hasher;
use crate::session::SessionConfig;
use crate::{OrgbookError, SecretString};

/// Top-level configuration shared by actions and the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct OrgbookConfig {
    pub contacts: ContactLimits,
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub hasher: HasherConfig,
}

impl OrgbookConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Local development: insecure cookies, cheap password hashing and a
    /// fixed signing key.
    pub fn development() -> Self {
        Self {
            contacts: ContactLimits::default(),
            storage: StorageConfig::default(),
            session: SessionConfig {
                cookie_secure: false,
                session_lifetime: Duration::hours(24),
                secret_key: SecretString::new("orgbook-development-secret-key-do-not-deploy"),
                ..SessionConfig::default()
            },
            hasher: HasherConfig {
                memory_cost: 4096,
                time_cost: 1,
                parallelism: 1,
            },
        }
    }

    /// Shorter sessions and heavier password hashing.
    pub fn strict() -> Self {
        Self {
            contacts: ContactLimits {
                max_avatar_bytes: 512 * 1024,
                ..ContactLimits::default()
            },
            storage: StorageConfig::default(),
            session: SessionConfig {
                session_lifetime: Duration::minutes(30),
                ..SessionConfig::default()
            },
            hasher: HasherConfig {
                memory_cost: 65536,
                time_cost: 3,
                parallelism: 4,
            },
        }
    }

    /// Reads overrides from `ORGBOOK_*` environment variables on top of the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` when a numeric variable does not parse or
    /// the resulting session config is invalid.
    pub fn from_env() -> Result<Self, OrgbookError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, OrgbookError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(secret) = lookup("ORGBOOK_SESSION_SECRET") {
            config.session.secret_key = SecretString::new(secret);
        }
        if let Some(secure) = lookup("ORGBOOK_COOKIE_SECURE") {
            config.session.cookie_secure = parse_bool("ORGBOOK_COOKIE_SECURE", &secure)?;
        }
        if let Some(root) = lookup("ORGBOOK_STORAGE_ROOT") {
            config.storage.root = PathBuf::from(root);
        }
        if let Some(prefix) = lookup("ORGBOOK_PUBLIC_URL_PREFIX") {
            config.storage.public_url_prefix = prefix;
        }
        if let Some(bytes) = lookup("ORGBOOK_MAX_AVATAR_BYTES") {
            config.contacts.max_avatar_bytes = parse_number("ORGBOOK_MAX_AVATAR_BYTES", &bytes)?;
        }
        if let Some(fields) = lookup("ORGBOOK_MAX_CUSTOM_FIELDS") {
            config.contacts.max_custom_fields = parse_number("ORGBOOK_MAX_CUSTOM_FIELDS", &fields)?;
        }

        config
            .session
            .validate()
            .map_err(|e| OrgbookError::ConfigurationError(e.to_owned()))?;

        Ok(config)
    }

    pub fn password_hasher(&self) -> Argon2Hasher {
        Argon2Hasher::new(
            self.hasher.memory_cost,
            self.hasher.time_cost,
            self.hasher.parallelism,
        )
    }
}

fn parse_number(key: &str, value: &str) -> Result<usize, OrgbookError> {
    value
        .trim()
        .parse()
        .map_err(|_| OrgbookError::ConfigurationError(format!("{key} must be a number")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, OrgbookError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(OrgbookError::ConfigurationError(format!(
            "{key} must be true or false"
        ))),
    }
}

/// Limits applied when validating contact input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactLimits {
    /// Maximum number of distinct custom-field keys per contact.
    ///
    /// Default: 5
    pub max_custom_fields: usize,

    /// Maximum decoded avatar size in bytes.
    ///
    /// Default: 1 MiB
    pub max_avatar_bytes: usize,

    /// Accepted avatar MIME types.
    pub allowed_avatar_types: Vec<String>,

    /// Maximum length of a single note body, in characters.
    ///
    /// Default: 10 000
    pub max_note_length: usize,
}

impl Default for ContactLimits {
    fn default() -> Self {
        Self {
            max_custom_fields: 5,
            max_avatar_bytes: 1024 * 1024,
            allowed_avatar_types: ["image/jpeg", "image/png", "image/gif", "image/webp"]
                .into_iter()
                .map(ToOwned::to_owned)
                .collect(),
            max_note_length: 10_000,
        }
    }
}

/// Where avatar files live and how they are exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding the public disk; avatars go under `avatars/`.
    pub root: PathBuf,

    /// Prefix prepended to stored relative paths to build public URLs.
    pub public_url_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("storage/public"),
            public_url_prefix: "/storage".to_owned(),
        }
    }
}

/// Argon2 parameters for user passwords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasherConfig {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            memory_cost: 19456,
            time_cost: 2,
            parallelism: 1,
        }
    }
}
