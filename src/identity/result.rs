use std::fmt;

/// A single failure reported by the identity layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityError {
    pub code: &'static str,
    pub description: String,
}

impl IdentityError {
    pub fn new(code: &'static str, description: impl Into<String>) -> Self {
        Self { code, description: description.into() }
    }

    pub fn invalid_user_name(name: &str) -> Self {
        Self::new(
            "InvalidUserName",
            format!("User name '{name}' is invalid, can only contain letters or digits."),
        )
    }

    pub fn duplicate_user_name(name: &str) -> Self {
        Self::new("DuplicateUserName", format!("User name '{name}' is already taken."))
    }

    pub fn invalid_email(email: &str) -> Self {
        Self::new("InvalidEmail", format!("Email '{email}' is invalid."))
    }

    pub fn duplicate_email(email: &str) -> Self {
        Self::new("DuplicateEmail", format!("Email '{email}' is already taken."))
    }

    pub fn invalid_role_name(name: &str) -> Self {
        Self::new("InvalidRoleName", format!("Role name '{name}' is invalid."))
    }

    pub fn duplicate_role_name(name: &str) -> Self {
        Self::new("DuplicateRoleName", format!("Role name '{name}' is already taken."))
    }

    pub fn role_not_found(name: &str) -> Self {
        Self::new("RoleNotFound", format!("Role '{name}' does not exist."))
    }

    pub fn user_already_in_role(name: &str) -> Self {
        Self::new("UserAlreadyInRole", format!("User already in role '{name}'."))
    }

    pub fn user_not_found() -> Self {
        Self::new("UserNotFound", "User Not Found")
    }
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// Outcome of an identity mutation: success, or an ordered list of errors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdentityResult {
    errors: Vec<IdentityError>,
}

impl IdentityResult {
    pub fn success() -> Self {
        Self { errors: vec![] }
    }

    pub fn failed(errors: Vec<IdentityError>) -> Self {
        Self { errors }
    }

    /// Success when `errors` is empty, failure otherwise.
    pub fn from_errors(errors: Vec<IdentityError>) -> Self {
        Self { errors }
    }

    pub fn succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[IdentityError] {
        &self.errors
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.description.clone()).collect()
    }
}
