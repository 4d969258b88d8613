use super::result::IdentityError;
use super::store::UserStore;
use crate::errors::AppError;
use crate::models::user::{AppUser, normalize};

const ALLOWED_USER_NAME_SYMBOLS: &str = "-._@+";
const MAX_EMAIL_LEN: usize = 254;

/// Rules applied to every new password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordOptions {
    pub required_length: usize,
    pub require_digit: bool,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_non_alphanumeric: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            required_length: 6,
            require_digit: true,
            require_lowercase: true,
            require_uppercase: true,
            require_non_alphanumeric: true,
        }
    }
}

/// Checks one password against `PasswordOptions`, one error per broken rule.
#[derive(Debug, Clone, Default)]
pub struct PasswordValidator {
    pub options: PasswordOptions,
}

impl PasswordValidator {
    pub fn new(options: PasswordOptions) -> Self {
        Self { options }
    }

    pub fn validate(&self, password: &str) -> Vec<IdentityError> {
        let opts = &self.options;
        let mut errors = vec![];
        if password.chars().count() < opts.required_length {
            errors.push(IdentityError::new(
                "PasswordTooShort",
                format!("Passwords must be at least {} characters.", opts.required_length),
            ));
        }
        if opts.require_non_alphanumeric && password.chars().all(|c| c.is_alphanumeric()) {
            errors.push(IdentityError::new(
                "PasswordRequiresNonAlphanumeric",
                "Passwords must have at least one non alphanumeric character.",
            ));
        }
        if opts.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push(IdentityError::new(
                "PasswordRequiresDigit",
                "Passwords must have at least one digit ('0'-'9').",
            ));
        }
        if opts.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
            errors.push(IdentityError::new(
                "PasswordRequiresLower",
                "Passwords must have at least one lowercase ('a'-'z').",
            ));
        }
        if opts.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
            errors.push(IdentityError::new(
                "PasswordRequiresUpper",
                "Passwords must have at least one uppercase ('A'-'Z').",
            ));
        }
        errors
    }
}

/// User name and email rules, including uniqueness against the store.
#[derive(Debug, Clone)]
pub struct UserValidator {
    pub require_unique_email: bool,
}

impl Default for UserValidator {
    fn default() -> Self {
        Self { require_unique_email: true }
    }
}

impl UserValidator {
    pub async fn validate(&self, store: &dyn UserStore, user: &AppUser) -> Result<Vec<IdentityError>, AppError> {
        let mut errors = vec![];

        if !is_valid_user_name(&user.user_name) {
            errors.push(IdentityError::invalid_user_name(&user.user_name));
        } else if let Some(owner) = store.find_user_by_name(&user.normalized_user_name()).await? {
            if owner.id != user.id {
                errors.push(IdentityError::duplicate_user_name(&user.user_name));
            }
        }

        if !is_valid_email(&user.email) {
            errors.push(IdentityError::invalid_email(&user.email));
        } else if self.require_unique_email {
            if let Some(owner) = store.find_user_by_email(&normalize(&user.email)).await? {
                if owner.id != user.id {
                    errors.push(IdentityError::duplicate_email(&user.email));
                }
            }
        }

        Ok(errors)
    }
}

/// ASCII letters and digits plus `-._@+`.
pub fn is_valid_user_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ALLOWED_USER_NAME_SYMBOLS.contains(c))
}

/// One '@', a non-empty local part, and a dotted domain with no empty labels.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}
