//! Administrative user management.
//!
//! `UserAdmin` is the command surface behind the `/admin` pages. It owns no
//! state: every command is forwarded to `UserManager`/`RoleManager` and the
//! identity result is turned into a value or an [`AdminError`]. Callers are
//! expected to have checked the admin role before calling in.

use std::fmt;

use crate::errors::AppError;
use crate::identity::{IdentityResult, RoleManager, UserManager};
use crate::models::user::AppUser;

pub const USER_NOT_FOUND: &str = "User Not Found";

#[derive(Debug)]
pub enum AdminError {
    /// Ordered, user-facing messages. Nothing was written.
    Validation(Vec<String>),
    NotFound,
    App(AppError),
}

impl AdminError {
    /// Messages to show next to the form.
    pub fn messages(&self) -> Vec<String> {
        match self {
            AdminError::Validation(errors) => errors.clone(),
            AdminError::NotFound => vec![USER_NOT_FOUND.to_string()],
            AdminError::App(_) => vec!["Unexpected error, see server log".to_string()],
        }
    }

    fn from_result(result: IdentityResult) -> Self {
        AdminError::Validation(result.descriptions())
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminError::Validation(errors) => write!(f, "Validation failed: {}", errors.join("; ")),
            AdminError::NotFound => write!(f, "{USER_NOT_FOUND}"),
            AdminError::App(e) => write!(f, "{e}"),
        }
    }
}

impl From<AppError> for AdminError {
    fn from(e: AppError) -> Self {
        AdminError::App(e)
    }
}

/// Input for [`UserAdmin::create`].
#[derive(Debug, Clone, Default)]
pub struct NewUserRequest {
    pub name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Clone)]
pub struct UserAdmin {
    users: UserManager,
    roles: RoleManager,
}

impl UserAdmin {
    pub fn new(users: UserManager, roles: RoleManager) -> Self {
        Self { users, roles }
    }

    pub fn user_manager(&self) -> &UserManager {
        &self.users
    }

    pub fn role_manager(&self) -> &RoleManager {
        &self.roles
    }

    /// Every user, in store order.
    pub async fn list(&self) -> Result<Vec<AppUser>, AppError> {
        self.users.users().await
    }

    pub async fn list_roles(&self) -> Result<Vec<String>, AppError> {
        Ok(self.roles.roles().await?.into_iter().map(|r| r.name).collect())
    }

    pub async fn create(&self, req: &NewUserRequest) -> Result<AppUser, AdminError> {
        let draft = AppUser::draft(&req.name, &req.email, &req.first_name, &req.last_name);
        let (result, stored) = self.users.create(&draft, &req.password).await?;
        match stored {
            Some(user) if result.succeeded() => {
                log::info!("Created user '{}' (id {})", user.user_name, user.id);
                Ok(user)
            }
            _ => {
                log::info!("Rejected new user '{}': {} error(s)", draft.user_name, result.errors().len());
                Err(AdminError::from_result(result))
            }
        }
    }

    pub async fn delete(&self, id: i64) -> Result<(), AdminError> {
        let user = self.users.find_by_id(id).await?.ok_or(AdminError::NotFound)?;
        let result = self.users.delete(&user).await?;
        if !result.succeeded() {
            return Err(AdminError::from_result(result));
        }
        log::info!("Deleted user '{}' (id {})", user.user_name, id);
        Ok(())
    }

    /// Current record for the edit form.
    pub async fn find_for_edit(&self, id: i64) -> Result<AppUser, AdminError> {
        self.users.find_by_id(id).await?.ok_or(AdminError::NotFound)
    }

    /// Change the email and, when `password` is non-empty, the password.
    ///
    /// Both checks run and all messages are collected. The record is
    /// written only when the email is valid and the password change (if
    /// any) is valid too; otherwise the stored user is left untouched.
    pub async fn edit(&self, id: i64, email: &str, password: Option<&str>) -> Result<AppUser, AdminError> {
        let password = password.filter(|p| !p.is_empty());
        let mut user = self.users.find_by_id(id).await?.ok_or(AdminError::NotFound)?;
        user.email = email.trim().to_string();

        let mut messages = vec![];
        let email_check = self.users.validate_user(&user).await?;
        messages.extend(email_check.descriptions());

        let password_ok = match password {
            None => true,
            Some(new_password) => {
                let password_check = self.users.validate_password(new_password);
                if password_check.succeeded() {
                    user.password_hash = self.users.hash_password(new_password)?;
                    true
                } else {
                    messages.extend(password_check.descriptions());
                    false
                }
            }
        };

        if !(email_check.succeeded() && password_ok) {
            return Err(AdminError::Validation(messages));
        }

        let result = self.users.update(&user).await?;
        if !result.succeeded() {
            return Err(AdminError::from_result(result));
        }
        log::info!(
            "Updated user '{}' (id {}, password changed: {})",
            user.user_name,
            id,
            password.is_some()
        );
        Ok(user)
    }

    /// Forwarded as-is; whether `role_name` exists is the role store's call.
    pub async fn add_user_to_role(&self, user_name: &str, role_name: &str) -> Result<(), AdminError> {
        let user = self.users.find_by_name(user_name).await?.ok_or(AdminError::NotFound)?;
        let result = self.users.add_to_role(&user, role_name).await?;
        if !result.succeeded() {
            return Err(AdminError::from_result(result));
        }
        log::info!("Added user '{}' to role '{}'", user.user_name, role_name.trim());
        Ok(())
    }

    pub async fn get_user_roles(&self, user_name: &str) -> Result<Vec<String>, AdminError> {
        let user = self.users.find_by_name(user_name).await?.ok_or(AdminError::NotFound)?;
        Ok(self.users.get_roles(&user).await?)
    }
}
