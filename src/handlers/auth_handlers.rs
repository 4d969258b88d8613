use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::admin::UserAdmin;
use crate::auth::csrf;
use crate::auth::session::{Roles, get_user_id, sign_in};
use crate::errors::{AppError, render, see_other};
use crate::templates_structs::LoginTemplate;

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

pub async fn login_page(session: Session) -> Result<HttpResponse, AppError> {
    if get_user_id(&session).is_some() {
        return Ok(see_other("/admin"));
    }

    let csrf_token = csrf::get_or_create_token(&session);
    render(LoginTemplate { error: None, username: String::new(), csrf_token })
}

pub async fn login_submit(
    admin: web::Data<UserAdmin>,
    session: Session,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let users = admin.user_manager();
    let found = users.find_by_name(&form.username).await?;

    if let Some(u) = found {
        if users.verify_password(&u, &form.password)? {
            let roles = Roles(users.get_roles(&u).await?);
            sign_in(&session, u.id, &u.user_name, &roles)?;
            log::info!("User '{}' signed in", u.user_name);
            return Ok(see_other("/admin"));
        }
    }

    log::warn!("Failed login for '{}'", form.username.trim());
    let csrf_token = csrf::get_or_create_token(&session);
    render(LoginTemplate {
        error: Some("Invalid username or password".to_string()),
        username: form.username.clone(),
        csrf_token,
    })
}

pub async fn logout(session: Session, form: web::Form<CsrfOnly>) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session.purge();
    Ok(see_other("/login"))
}
