use std::sync::Arc;

use super::result::{IdentityError, IdentityResult};
use super::store::UserStore;
use crate::errors::AppError;
use crate::models::role::Role;
use crate::models::user::normalize;

/// Role lookups and creation. Roles are only created at startup or by
/// seeding; the admin surface just lists them.
#[derive(Clone)]
pub struct RoleManager {
    store: Arc<dyn UserStore>,
}

impl RoleManager {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn roles(&self) -> Result<Vec<Role>, AppError> {
        self.store.list_roles().await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AppError> {
        self.store.find_role_by_name(&normalize(name)).await
    }

    pub async fn create(&self, name: &str) -> Result<IdentityResult, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(IdentityResult::failed(vec![IdentityError::invalid_role_name(name)]));
        }
        if self.find_by_name(name).await?.is_some() {
            return Ok(IdentityResult::failed(vec![IdentityError::duplicate_role_name(name)]));
        }
        match self.store.insert_role(name).await {
            Ok(_) => Ok(IdentityResult::success()),
            Err(AppError::Conflict(_)) => Ok(IdentityResult::failed(vec![IdentityError::duplicate_role_name(name)])),
            Err(e) => Err(e),
        }
    }

    /// Create the role unless it already exists.
    pub async fn ensure(&self, name: &str) -> Result<Role, AppError> {
        if let Some(role) = self.find_by_name(name).await? {
            return Ok(role);
        }
        match self.store.insert_role(name).await {
            Ok(role) => {
                log::info!("Created role '{}'", role.name);
                Ok(role)
            }
            // lost a race with another instance
            Err(AppError::Conflict(_)) => self.find_by_name(name).await?.ok_or(AppError::NotFound),
            Err(e) => Err(e),
        }
    }
}
