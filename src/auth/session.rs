use actix_session::Session;

use crate::errors::AppError;

/// Role names of the signed-in user, with a `has()` for Askama templates.
#[derive(Debug, Clone, Default)]
pub struct Roles(pub Vec<String>);

impl Roles {
    pub fn has(&self, role: &str) -> bool {
        self.0.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    pub fn from_csv(csv: &str) -> Self {
        let names = csv
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        Roles(names)
    }

    pub fn to_csv(&self) -> String {
        self.0.join(",")
    }
}

/// Store the signed-in user. Replaces anything from a previous login.
pub fn sign_in(session: &Session, user_id: i64, username: &str, roles: &Roles) -> Result<(), AppError> {
    session.renew();
    session
        .insert("user_id", user_id)
        .and_then(|_| session.insert("username", username))
        .map_err(|e| AppError::Session(e.to_string()))?;
    set_roles(session, roles)
}

/// Replace the cached role list, e.g. after re-reading it from the store.
pub fn set_roles(session: &Session, roles: &Roles) -> Result<(), AppError> {
    session
        .insert("roles", roles.to_csv())
        .map_err(|e| AppError::Session(e.to_string()))
}

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

pub fn get_username(session: &Session) -> Result<String, AppError> {
    match session.get::<String>("username") {
        Ok(Some(username)) => Ok(username),
        Ok(None) => Err(AppError::Session("No username in session".to_string())),
        Err(e) => Err(AppError::Session(e.to_string())),
    }
}

pub fn get_roles(session: &Session) -> Roles {
    match session.get::<String>("roles") {
        Ok(Some(csv)) => Roles::from_csv(&csv),
        _ => Roles::default(),
    }
}

pub fn set_flash(session: &Session, msg: &str) {
    if let Err(e) = session.insert("flash", msg) {
        log::warn!("Could not store flash message: {e}");
    }
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>("flash").unwrap_or(None);
    if flash.is_some() {
        session.remove("flash");
    }
    flash
}

/// Check the role; returns Err(AppError::PermissionDenied) if missing.
pub fn require_role(session: &Session, role: &str) -> Result<(), AppError> {
    if get_roles(session).has(role) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(role.to_string()))
    }
}
