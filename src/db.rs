use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::{AdminSeed, AppConfig};
use crate::errors::AppError;
use crate::identity::{MemoryUserStore, PgUserStore, RoleManager, UserManager, UserStore};
use crate::models::role::ADMIN_ROLE;
use crate::models::user::AppUser;

pub const MIGRATIONS: &str = include_str!("schema.sql");

pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::raw_sql(MIGRATIONS).execute(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise an in-memory store.
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn UserStore>, AppError> {
    match &config.database_url {
        Some(url) => {
            let pool = init_pool(url, config.database_max_connections).await?;
            run_migrations(&pool).await?;
            Ok(Arc::new(PgUserStore::new(pool)))
        }
        None => {
            log::warn!("No DATABASE_URL set, using in-memory user store (data lost on restart)");
            Ok(Arc::new(MemoryUserStore::new()))
        }
    }
}

/// Ensure the Admin role exists and the seed account holds it.
/// An existing account keeps its current password and email.
pub async fn seed_admin(users: &UserManager, roles: &RoleManager, seed: &AdminSeed) -> Result<(), AppError> {
    roles.ensure(ADMIN_ROLE).await?;

    let admin = match users.find_by_name(&seed.user_name).await? {
        Some(existing) => existing,
        None => {
            let draft = AppUser::draft(&seed.user_name, &seed.email, "", "");
            let (result, stored) = users.create(&draft, &seed.password).await?;
            match stored {
                Some(user) => {
                    log::info!("Seeded admin account '{}'", user.user_name);
                    user
                }
                None => {
                    return Err(AppError::Config(format!(
                        "Cannot seed admin account '{}': {}",
                        seed.user_name,
                        result.descriptions().join(" ")
                    )));
                }
            }
        }
    };

    if !users.is_in_role(&admin, ADMIN_ROLE).await? {
        let result = users.add_to_role(&admin, ADMIN_ROLE).await?;
        if !result.succeeded() {
            return Err(AppError::Config(result.descriptions().join(" ")));
        }
    }
    Ok(())
}
