//! Shared test infrastructure.
//!
//! Every test gets its own `MemoryUserStore`, so tests never share state
//! and need no database.
//!
//! - `setup_admin()` - facade over an empty store
//! - `setup_admin_seeded()` - same, plus the Admin role and admin account
//! - `login()` - drive the login form of a test service, returns the
//!   session cookie and CSRF token

#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test;
use regex::Regex;

use useradmin::admin::{NewUserRequest, UserAdmin};
use useradmin::build_admin;
use useradmin::config::AppConfig;
use useradmin::db::seed_admin;
use useradmin::identity::MemoryUserStore;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "Secret123$";
pub const VALID_PASSWORD: &str = "Passw0rd!";

// ============================================================================
// FACADE SETUP
// ============================================================================

pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|_| None).expect("default config")
}

pub fn setup_admin() -> UserAdmin {
    build_admin(Arc::new(MemoryUserStore::new()), &test_config())
}

pub async fn setup_admin_seeded() -> UserAdmin {
    let admin = setup_admin();
    let config = test_config();
    seed_admin(admin.user_manager(), admin.role_manager(), &config.admin)
        .await
        .expect("seed admin");
    admin
}

pub fn new_user(name: &str) -> NewUserRequest {
    NewUserRequest {
        name: name.to_string(),
        email: format!("{name}@example.com"),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        password: VALID_PASSWORD.to_string(),
    }
}

// ============================================================================
// HTTP HELPERS
// ============================================================================

pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == "id")
        .map(|c| c.into_owned())
}

pub fn csrf_token(html: &str) -> String {
    let re = Regex::new(r#"name="csrf_token" value="([0-9a-f]{64})""#).expect("regex");
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .expect("CSRF token in page")
}

pub async fn body_text<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Log in through the form. Panics unless the login redirects.
pub async fn login<S, B>(app: &S, username: &str, password: &str) -> (Cookie<'static>, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, test::TestRequest::get().uri("/login").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_cookie(&resp).expect("session cookie from login page");
    let token = csrf_token(&body_text(resp).await);

    let req = test::TestRequest::post()
        .uri("/login")
        .cookie(cookie)
        .set_form(vec![("username", username), ("password", password), ("csrf_token", token.as_str())])
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER, "login should redirect");
    assert_eq!(location(&resp), "/admin");
    let cookie = session_cookie(&resp).expect("session cookie after login");
    (cookie, token)
}
