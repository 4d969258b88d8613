//! Runtime configuration from environment variables (and an optional
//! `.env` file loaded by `main`).

use std::env;

use crate::errors::AppError;
use crate::identity::PasswordOptions;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Unset means the in-memory store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub session_key: Option<String>,
    pub session_cookie_secure: bool,
    pub admin: AdminSeed,
    pub password: PasswordOptions,
    pub require_unique_email: bool,
}

/// Account created at startup when it does not exist yet.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = PasswordOptions::default();

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            database_url: get("DATABASE_URL"),
            database_max_connections: parse_or(get("DATABASE_MAX_CONNECTIONS"), "DATABASE_MAX_CONNECTIONS", 8)?,
            session_key: get("SESSION_KEY"),
            session_cookie_secure: parse_flag(get("SESSION_COOKIE_SECURE"), "SESSION_COOKIE_SECURE", false)?,
            admin: AdminSeed {
                user_name: get("ADMIN_USER").unwrap_or_else(|| "admin".to_string()),
                email: get("ADMIN_EMAIL").unwrap_or_else(|| "admin@example.com".to_string()),
                password: get("ADMIN_PASSWORD").unwrap_or_else(|| "Secret123$".to_string()),
            },
            password: PasswordOptions {
                required_length: parse_or(get("PASSWORD_MIN_LENGTH"), "PASSWORD_MIN_LENGTH", defaults.required_length)?,
                require_digit: parse_flag(get("PASSWORD_REQUIRE_DIGIT"), "PASSWORD_REQUIRE_DIGIT", defaults.require_digit)?,
                require_lowercase: parse_flag(
                    get("PASSWORD_REQUIRE_LOWERCASE"),
                    "PASSWORD_REQUIRE_LOWERCASE",
                    defaults.require_lowercase,
                )?,
                require_uppercase: parse_flag(
                    get("PASSWORD_REQUIRE_UPPERCASE"),
                    "PASSWORD_REQUIRE_UPPERCASE",
                    defaults.require_uppercase,
                )?,
                require_non_alphanumeric: parse_flag(
                    get("PASSWORD_REQUIRE_NON_ALPHANUMERIC"),
                    "PASSWORD_REQUIRE_NON_ALPHANUMERIC",
                    defaults.require_non_alphanumeric,
                )?,
            },
            require_unique_email: parse_flag(get("REQUIRE_UNIQUE_EMAIL"), "REQUIRE_UNIQUE_EMAIL", true)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> Result<T, AppError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{key} has an invalid value: '{v}'"))),
    }
}

fn parse_flag(value: Option<String>, key: &str, default: bool) -> Result<bool, AppError> {
    match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(AppError::Config(format!("{key} must be true or false, got '{v}'"))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = config_from(&[]).expect("config");
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR);
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.database_max_connections, 8);
        assert!(!cfg.session_cookie_secure);
        assert_eq!(cfg.admin.user_name, "admin");
        assert_eq!(cfg.password, PasswordOptions::default());
        assert!(cfg.require_unique_email);
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = config_from(&[
            ("DATABASE_URL", "postgres://localhost/users"),
            ("PASSWORD_MIN_LENGTH", "12"),
            ("PASSWORD_REQUIRE_NON_ALPHANUMERIC", "no"),
            ("SESSION_COOKIE_SECURE", "TRUE"),
        ])
        .expect("config");
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/users"));
        assert_eq!(cfg.password.required_length, 12);
        assert!(!cfg.password.require_non_alphanumeric);
        assert!(cfg.session_cookie_secure);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = config_from(&[("DATABASE_URL", "  "), ("BIND_ADDR", "")]).expect("config");
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR);
    }

    #[test]
    fn bad_values_are_config_errors() {
        assert!(matches!(config_from(&[("PASSWORD_MIN_LENGTH", "six")]), Err(AppError::Config(_))));
        assert!(matches!(config_from(&[("REQUIRE_UNIQUE_EMAIL", "maybe")]), Err(AppError::Config(_))));
    }
}
