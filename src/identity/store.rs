//! Persistence port for users, roles and role memberships.
//!
//! `UserManager` and `RoleManager` are the only callers. Production backs
//! this port with PostgreSQL (`PgUserStore`); tests and database-less runs
//! use `MemoryUserStore`. Lookups by name or email take the normalized
//! (upper-case) form.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::role::Role;
use crate::models::user::AppUser;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users in ascending id order.
    async fn list_users(&self) -> Result<Vec<AppUser>, AppError>;

    async fn find_user_by_id(&self, id: i64) -> Result<Option<AppUser>, AppError>;

    async fn find_user_by_name(&self, normalized_name: &str) -> Result<Option<AppUser>, AppError>;

    async fn find_user_by_email(&self, normalized_email: &str) -> Result<Option<AppUser>, AppError>;

    /// Insert and return the stored record with its assigned id.
    /// Fails with `AppError::Conflict` on a duplicate user name.
    async fn insert_user(&self, user: &AppUser) -> Result<AppUser, AppError>;

    /// Overwrite the record with `user.id`. `AppError::NotFound` if it is gone.
    async fn update_user(&self, user: &AppUser) -> Result<(), AppError>;

    /// Remove the user and its role memberships. Returns false if absent.
    async fn delete_user(&self, id: i64) -> Result<bool, AppError>;

    async fn list_roles(&self) -> Result<Vec<Role>, AppError>;

    async fn find_role_by_name(&self, normalized_name: &str) -> Result<Option<Role>, AppError>;

    async fn insert_role(&self, name: &str) -> Result<Role, AppError>;

    /// Returns false when the membership already existed.
    async fn add_user_to_role(&self, user_id: i64, role_id: i64) -> Result<bool, AppError>;

    /// Role names for the user, ordered by role name.
    async fn roles_for_user(&self, user_id: i64) -> Result<Vec<String>, AppError>;
}
