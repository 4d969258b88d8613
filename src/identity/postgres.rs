use async_trait::async_trait;
use sqlx::PgPool;

use super::store::UserStore;
use crate::errors::AppError;
use crate::models::role::Role;
use crate::models::user::{AppUser, normalize};

const SELECT_USER: &str = "\
    SELECT id, user_name, email, first_name, last_name, password_hash, created_at \
    FROM users";

/// `UserStore` over the `users`, `roles` and `user_roles` tables.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn conflict_or_db(e: sqlx::Error, msg: String) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(msg),
        _ => AppError::Db(e),
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list_users(&self) -> Result<Vec<AppUser>, AppError> {
        let users = sqlx::query_as::<_, AppUser>(&format!("{SELECT_USER} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<AppUser>, AppError> {
        let user = sqlx::query_as::<_, AppUser>(&format!("{SELECT_USER} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_name(&self, normalized_name: &str) -> Result<Option<AppUser>, AppError> {
        let user = sqlx::query_as::<_, AppUser>(&format!("{SELECT_USER} WHERE normalized_user_name = $1"))
            .bind(normalized_name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, normalized_email: &str) -> Result<Option<AppUser>, AppError> {
        let user = sqlx::query_as::<_, AppUser>(&format!(
            "{SELECT_USER} WHERE normalized_email = $1 ORDER BY id LIMIT 1"
        ))
        .bind(normalized_email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: &AppUser) -> Result<AppUser, AppError> {
        let stored = sqlx::query_as::<_, AppUser>(
            "INSERT INTO users \
                 (user_name, normalized_user_name, email, normalized_email, \
                  first_name, last_name, password_hash, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id, user_name, email, first_name, last_name, password_hash, created_at",
        )
        .bind(&user.user_name)
        .bind(user.normalized_user_name())
        .bind(&user.email)
        .bind(user.normalized_email())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_db(e, format!("User name '{}' is already taken.", user.user_name)))?;
        Ok(stored)
    }

    async fn update_user(&self, user: &AppUser) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE users SET user_name = $1, normalized_user_name = $2, email = $3, \
                 normalized_email = $4, first_name = $5, last_name = $6, password_hash = $7 \
             WHERE id = $8",
        )
        .bind(&user.user_name)
        .bind(user.normalized_user_name())
        .bind(&user.email)
        .bind(user.normalized_email())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_db(e, format!("User name '{}' is already taken.", user.user_name)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn delete_user(&self, id: i64) -> Result<bool, AppError> {
        // user_roles rows go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>("SELECT id, name FROM roles ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(roles)
    }

    async fn find_role_by_name(&self, normalized_name: &str) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>("SELECT id, name FROM roles WHERE normalized_name = $1")
            .bind(normalized_name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(role)
    }

    async fn insert_role(&self, name: &str) -> Result<Role, AppError> {
        let name = name.trim();
        let role = sqlx::query_as::<_, Role>(
            "INSERT INTO roles (name, normalized_name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(name)
        .bind(normalize(name))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_db(e, format!("Role name '{name}' is already taken.")))?;
        Ok(role)
    }

    async fn add_user_to_role(&self, user_id: i64, role_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => AppError::NotFound,
            _ => AppError::Db(e),
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn roles_for_user(&self, user_id: i64) -> Result<Vec<String>, AppError> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT r.name FROM user_roles ur \
             JOIN roles r ON r.id = ur.role_id \
             WHERE ur.user_id = $1 \
             ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }
}
