use actix_session::Session;
use actix_web::{HttpResponse, web};

use super::helpers::{messages_or_fail, render_index};
use crate::admin::{AdminError, UserAdmin};
use crate::auth::csrf;
use crate::auth::session::{require_role, set_flash};
use crate::errors::{AppError, see_other};
use crate::models::role::{ADMIN_ROLE, AddToRoleForm, UserRolesQuery};

/// POST /admin/roles/add
pub async fn add_user_to_role(
    admin: web::Data<UserAdmin>,
    session: Session,
    form: web::Form<AddToRoleForm>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, ADMIN_ROLE)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    match admin.add_user_to_role(&form.user_name, &form.role_name).await {
        Ok(()) => {
            set_flash(
                &session,
                &format!("Added '{}' to role '{}'", form.user_name.trim(), form.role_name.trim()),
            );
            Ok(see_other("/admin"))
        }
        Err(e) => {
            let (errors, status) = messages_or_fail(e)?;
            render_index(&admin, &session, errors, status).await
        }
    }
}

/// GET /admin/roles?user_name=...: role names as a JSON array.
pub async fn user_roles(
    admin: web::Data<UserAdmin>,
    session: Session,
    query: web::Query<UserRolesQuery>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, ADMIN_ROLE)?;

    match admin.get_user_roles(&query.user_name).await {
        Ok(roles) => Ok(HttpResponse::Ok().json(roles)),
        Err(AdminError::App(e)) => Err(e),
        Err(e) => Ok(HttpResponse::NotFound().json(serde_json::json!({ "errors": e.messages() }))),
    }
}
