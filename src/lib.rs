pub mod admin;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod templates_structs;

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{HttpResponse, cookie::Key, web};

use crate::admin::UserAdmin;
use crate::config::AppConfig;
use crate::identity::{PasswordValidator, RoleManager, UserManager, UserStore, UserValidator};

/// Wire the identity managers and the admin facade over `store`.
pub fn build_admin(store: Arc<dyn UserStore>, config: &AppConfig) -> UserAdmin {
    let users = UserManager::new(
        store.clone(),
        UserValidator { require_unique_email: config.require_unique_email },
        PasswordValidator::new(config.password.clone()),
    );
    UserAdmin::new(users, RoleManager::new(store))
}

pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(secure)
        .cookie_http_only(true)
        .build()
}

/// All routes. The caller supplies `web::Data<UserAdmin>`, the session
/// middleware and `not_found` as default service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/login", web::get().to(handlers::auth_handlers::login_page))
        .route("/login", web::post().to(handlers::auth_handlers::login_submit))
        .route("/", web::get().to(|| async { errors::see_other("/admin") }))
        // Protected routes
        .service(
            web::scope("")
                .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                .route("/logout", web::post().to(handlers::auth_handlers::logout))
                .route("/admin", web::get().to(handlers::admin_handlers::list))
                .route("/admin/create", web::get().to(handlers::admin_handlers::new_form))
                .route("/admin/create", web::post().to(handlers::admin_handlers::create))
                .route("/admin/delete/{id}", web::post().to(handlers::admin_handlers::delete))
                .route("/admin/edit/{id}", web::get().to(handlers::admin_handlers::edit_form))
                .route("/admin/edit/{id}", web::post().to(handlers::admin_handlers::update))
                .route("/admin/roles/add", web::post().to(handlers::admin_handlers::add_user_to_role))
                .route("/admin/roles", web::get().to(handlers::admin_handlers::user_roles)),
        );
}

/// Default service for unmatched paths.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("../templates/errors/404.html"))
}
