use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Identity record as held by the user store. Includes the password hash,
/// so it is never serialized to clients.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct AppUser {
    pub id: i64,
    pub user_name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl AppUser {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    pub fn normalized_user_name(&self) -> String {
        normalize(&self.user_name)
    }

    pub fn normalized_email(&self) -> String {
        normalize(&self.email)
    }

    /// Unsaved user built from admin input; the id is assigned on insert.
    pub fn draft(user_name: &str, email: &str, first_name: &str, last_name: &str) -> Self {
        Self {
            id: 0,
            user_name: user_name.trim().to_string(),
            email: email.trim().to_string(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }
}

/// Lookup key for user names, emails and role names.
///
/// Upper-cases one char to one char; chars whose upper case expands
/// (`'ß'` to `"SS"`) are kept as they are.
pub fn normalize(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            }
        })
        .collect()
}

/// Form data from the create user form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl CreateForm {
    /// Required-field checks that run before the identity validators.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut errors = vec![];
        if self.name.trim().is_empty() {
            errors.push("The Name field is required.".to_string());
        }
        if self.email.trim().is_empty() {
            errors.push("The Email field is required.".to_string());
        }
        if self.password.is_empty() {
            errors.push("The Password field is required.".to_string());
        }
        errors
    }
}

/// Form data from the edit user form. `password` is left blank to keep
/// the current credential.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub email: String,
    pub password: Option<String>,
    #[serde(default)]
    pub csrf_token: String,
}

impl EditForm {
    /// `None` means no password change was requested.
    pub fn password_change(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_password_is_no_change() {
        let mut form = EditForm { email: "a@b.io".to_string(), password: None, csrf_token: String::new() };
        assert_eq!(form.password_change(), None);
        form.password = Some(String::new());
        assert_eq!(form.password_change(), None);
        form.password = Some("Secret1!".to_string());
        assert_eq!(form.password_change(), Some("Secret1!"));
    }

    #[test]
    fn create_form_reports_each_missing_field() {
        let form = CreateForm { first_name: "Ada".to_string(), ..Default::default() };
        let errors = form.missing_fields();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("Name"));
        assert!(errors[2].contains("Password"));
    }

    #[test]
    fn normalize_is_case_and_whitespace_insensitive() {
        assert_eq!(normalize(" alice "), normalize("ALICE"));
    }

    #[test]
    fn normalize_does_not_expand_sharp_s() {
        assert_ne!(normalize("straße"), normalize("STRASSE"));
        assert_eq!(normalize("Émile@Example.com"), "ÉMILE@EXAMPLE.COM");
    }
}
