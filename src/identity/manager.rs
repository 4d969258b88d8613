use std::sync::Arc;

use super::result::{IdentityError, IdentityResult};
use super::store::UserStore;
use super::validators::{PasswordValidator, UserValidator};
use crate::auth::password;
use crate::errors::AppError;
use crate::models::user::{AppUser, normalize};

/// Identity collaborator for user records: validation, hashing,
/// persistence and role membership. Every call is async and awaited.
#[derive(Clone)]
pub struct UserManager {
    store: Arc<dyn UserStore>,
    user_validator: UserValidator,
    password_validator: PasswordValidator,
}

impl UserManager {
    pub fn new(store: Arc<dyn UserStore>, user_validator: UserValidator, password_validator: PasswordValidator) -> Self {
        Self { store, user_validator, password_validator }
    }

    pub async fn users(&self) -> Result<Vec<AppUser>, AppError> {
        self.store.list_users().await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<AppUser>, AppError> {
        self.store.find_user_by_id(id).await
    }

    pub async fn find_by_name(&self, user_name: &str) -> Result<Option<AppUser>, AppError> {
        self.store.find_user_by_name(&normalize(user_name)).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<AppUser>, AppError> {
        self.store.find_user_by_email(&normalize(email)).await
    }

    pub async fn validate_user(&self, user: &AppUser) -> Result<IdentityResult, AppError> {
        let errors = self.user_validator.validate(self.store.as_ref(), user).await?;
        Ok(IdentityResult::from_errors(errors))
    }

    pub fn validate_password(&self, password: &str) -> IdentityResult {
        IdentityResult::from_errors(self.password_validator.validate(password))
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        password::hash_password(password)
    }

    pub fn verify_password(&self, user: &AppUser, password: &str) -> Result<bool, AppError> {
        if user.password_hash.is_empty() {
            return Ok(false);
        }
        password::verify_password(password, &user.password_hash)
    }

    /// Validate `user` and `password` together, then hash and insert.
    /// Nothing is written when any rule fails.
    pub async fn create(&self, user: &AppUser, password: &str) -> Result<(IdentityResult, Option<AppUser>), AppError> {
        let mut errors = self.password_validator.validate(password);
        errors.extend(self.user_validator.validate(self.store.as_ref(), user).await?);
        if !errors.is_empty() {
            return Ok((IdentityResult::failed(errors), None));
        }

        let mut record = user.clone();
        record.password_hash = self.hash_password(password)?;
        match self.store.insert_user(&record).await {
            Ok(stored) => Ok((IdentityResult::success(), Some(stored))),
            Err(AppError::Conflict(_)) => Ok((
                IdentityResult::failed(vec![IdentityError::duplicate_user_name(&user.user_name)]),
                None,
            )),
            Err(e) => Err(e),
        }
    }

    /// Re-validate and persist `user` as given.
    pub async fn update(&self, user: &AppUser) -> Result<IdentityResult, AppError> {
        let validation = self.validate_user(user).await?;
        if !validation.succeeded() {
            return Ok(validation);
        }
        match self.store.update_user(user).await {
            Ok(()) => Ok(IdentityResult::success()),
            Err(AppError::Conflict(_)) => Ok(IdentityResult::failed(vec![
                IdentityError::duplicate_user_name(&user.user_name),
            ])),
            Err(AppError::NotFound) => Ok(IdentityResult::failed(vec![IdentityError::user_not_found()])),
            Err(e) => Err(e),
        }
    }

    pub async fn delete(&self, user: &AppUser) -> Result<IdentityResult, AppError> {
        if self.store.delete_user(user.id).await? {
            Ok(IdentityResult::success())
        } else {
            Ok(IdentityResult::failed(vec![IdentityError::user_not_found()]))
        }
    }

    pub async fn add_to_role(&self, user: &AppUser, role_name: &str) -> Result<IdentityResult, AppError> {
        let Some(role) = self.store.find_role_by_name(&normalize(role_name)).await? else {
            return Ok(IdentityResult::failed(vec![IdentityError::role_not_found(role_name)]));
        };
        match self.store.add_user_to_role(user.id, role.id).await {
            Ok(true) => Ok(IdentityResult::success()),
            Ok(false) => Ok(IdentityResult::failed(vec![IdentityError::user_already_in_role(&role.name)])),
            Err(AppError::NotFound) => Ok(IdentityResult::failed(vec![IdentityError::user_not_found()])),
            Err(e) => Err(e),
        }
    }

    pub async fn get_roles(&self, user: &AppUser) -> Result<Vec<String>, AppError> {
        self.store.roles_for_user(user.id).await
    }

    pub async fn is_in_role(&self, user: &AppUser, role_name: &str) -> Result<bool, AppError> {
        let wanted = normalize(role_name);
        Ok(self
            .get_roles(user)
            .await?
            .iter()
            .any(|r| normalize(r) == wanted))
    }
}
