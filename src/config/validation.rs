//! Configuration validation.
//!
//! Returns all validation errors, not just the first, so one edit fixes a
//! broken file.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::ApiConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &ApiConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.auth.token_ttl_secs == 0 {
        errors.push(ValidationError::new("auth.token_ttl_secs", "must be greater than zero"));
    }
    if config.auth.role.is_empty() {
        errors.push(ValidationError::new("auth.role", "must not be empty"));
    }
    if config.auth.secret_env.is_empty() {
        errors.push(ValidationError::new("auth.secret_env", "must not be empty"));
    }

    if config.lifecycle.drain_deadline_secs == 0 {
        errors.push(ValidationError::new(
            "lifecycle.drain_deadline_secs",
            "must be greater than zero",
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than zero"));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than zero"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    for (i, user) in config.store.users.iter().enumerate() {
        if user.username.is_empty() {
            errors.push(ValidationError::new(
                format!("store.users[{}].username", i),
                "must not be empty",
            ));
        }
        if user.password_sha256.len() != 64
            || !user.password_sha256.chars().all(|c| c.is_ascii_hexdigit())
        {
            errors.push(ValidationError::new(
                format!("store.users[{}].password_sha256", i),
                "must be a 64 character hex SHA-256 digest",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::UserSeed;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ApiConfig::default()), Ok(()));
    }

    #[test]
    fn test_bad_bind_address() {
        let mut config = ApiConfig::default();
        config.listener.bind_address = "localhost".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "listener.bind_address");
    }

    #[test]
    fn test_bad_user_seed() {
        let mut config = ApiConfig::default();
        config.store.users.push(UserSeed {
            username: String::new(),
            password_sha256: "plaintext".into(),
            role: "admin".into(),
        });
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[1].to_string().starts_with("store.users[0].password_sha256"));
    }
}
