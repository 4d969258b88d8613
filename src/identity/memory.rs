use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use async_trait::async_trait;

use super::store::UserStore;
use crate::errors::AppError;
use crate::models::role::Role;
use crate::models::user::{AppUser, normalize};

#[derive(Default)]
struct Inner {
    next_user_id: i64,
    next_role_id: i64,
    users: BTreeMap<i64, AppUser>,
    roles: BTreeMap<i64, Role>,
    // (user_id, role_id)
    memberships: BTreeSet<(i64, i64)>,
}

/// In-process store. State lives as long as the value does.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list_users(&self) -> Result<Vec<AppUser>, AppError> {
        Ok(self.read().users.values().cloned().collect())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<AppUser>, AppError> {
        Ok(self.read().users.get(&id).cloned())
    }

    async fn find_user_by_name(&self, normalized_name: &str) -> Result<Option<AppUser>, AppError> {
        Ok(self
            .read()
            .users
            .values()
            .find(|u| u.normalized_user_name() == normalized_name)
            .cloned())
    }

    async fn find_user_by_email(&self, normalized_email: &str) -> Result<Option<AppUser>, AppError> {
        Ok(self
            .read()
            .users
            .values()
            .find(|u| u.normalized_email() == normalized_email)
            .cloned())
    }

    async fn insert_user(&self, user: &AppUser) -> Result<AppUser, AppError> {
        let mut inner = self.write();
        let key = user.normalized_user_name();
        if inner.users.values().any(|u| u.normalized_user_name() == key) {
            return Err(AppError::Conflict(format!("User name '{}' is already taken.", user.user_name)));
        }
        inner.next_user_id += 1;
        let mut stored = user.clone();
        stored.id = inner.next_user_id;
        inner.users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_user(&self, user: &AppUser) -> Result<(), AppError> {
        let mut inner = self.write();
        let key = user.normalized_user_name();
        if inner.users.values().any(|u| u.id != user.id && u.normalized_user_name() == key) {
            return Err(AppError::Conflict(format!("User name '{}' is already taken.", user.user_name)));
        }
        match inner.users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(AppError::NotFound),
        }
    }

    async fn delete_user(&self, id: i64) -> Result<bool, AppError> {
        let mut inner = self.write();
        if inner.users.remove(&id).is_none() {
            return Ok(false);
        }
        inner.memberships.retain(|(user_id, _)| *user_id != id);
        Ok(true)
    }

    async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        let mut roles: Vec<Role> = self.read().roles.values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn find_role_by_name(&self, normalized_name: &str) -> Result<Option<Role>, AppError> {
        Ok(self
            .read()
            .roles
            .values()
            .find(|r| normalize(&r.name) == normalized_name)
            .cloned())
    }

    async fn insert_role(&self, name: &str) -> Result<Role, AppError> {
        let mut inner = self.write();
        let key = normalize(name);
        if inner.roles.values().any(|r| normalize(&r.name) == key) {
            return Err(AppError::Conflict(format!("Role name '{name}' is already taken.")));
        }
        inner.next_role_id += 1;
        let role = Role { id: inner.next_role_id, name: name.trim().to_string() };
        inner.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn add_user_to_role(&self, user_id: i64, role_id: i64) -> Result<bool, AppError> {
        let mut inner = self.write();
        if !inner.users.contains_key(&user_id) || !inner.roles.contains_key(&role_id) {
            return Err(AppError::NotFound);
        }
        Ok(inner.memberships.insert((user_id, role_id)))
    }

    async fn roles_for_user(&self, user_id: i64) -> Result<Vec<String>, AppError> {
        let inner = self.read();
        let mut names: Vec<String> = inner
            .memberships
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .filter_map(|(_, role_id)| inner.roles.get(role_id).map(|r| r.name.clone()))
            .collect();
        names.sort();
        Ok(names)
    }
}
