use actix_session::Session;
use actix_web::{HttpResponse, web};

use super::helpers::{messages_or_fail, render_index};
use crate::admin::UserAdmin;
use crate::auth::csrf;
use crate::auth::session::{get_user_id, require_role, set_flash};
use crate::errors::{AppError, see_other};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::models::role::ADMIN_ROLE;

/// POST /admin/delete/{id}
pub async fn delete(
    admin: web::Data<UserAdmin>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, ADMIN_ROLE)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();

    if get_user_id(&session) == Some(id) {
        set_flash(&session, "You cannot delete your own account");
        return Ok(see_other("/admin"));
    }

    match admin.delete(id).await {
        Ok(()) => {
            set_flash(&session, "User deleted");
            Ok(see_other("/admin"))
        }
        Err(e) => {
            let (errors, status) = messages_or_fail(e)?;
            render_index(&admin, &session, errors, status).await
        }
    }
}
