use actix_session::Session;
use actix_web::{HttpResponse, web};

use super::helpers::{messages_or_fail, render_index};
use crate::admin::{AdminError, UserAdmin};
use crate::auth::csrf;
use crate::auth::session::{require_role, set_flash};
use crate::errors::{AppError, render, see_other};
use crate::models::role::ADMIN_ROLE;
use crate::models::user::EditForm;
use crate::templates_structs::{PageContext, UserEditTemplate};

/// GET /admin/edit/{id}. An unknown id goes back to the listing.
pub async fn edit_form(
    admin: web::Data<UserAdmin>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, ADMIN_ROLE)?;

    match admin.find_for_edit(path.into_inner()).await {
        Ok(user) => {
            let ctx = PageContext::build(&session)?;
            render(UserEditTemplate { ctx, user, errors: vec![] })
        }
        Err(AdminError::NotFound) => {
            set_flash(&session, crate::admin::USER_NOT_FOUND);
            Ok(see_other("/admin"))
        }
        Err(e) => {
            let (errors, status) = messages_or_fail(e)?;
            render_index(&admin, &session, errors, status).await
        }
    }
}

/// POST /admin/edit/{id}
pub async fn update(
    admin: web::Data<UserAdmin>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<EditForm>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, ADMIN_ROLE)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();

    match admin.edit(id, &form.email, form.password_change()).await {
        Ok(user) => {
            set_flash(&session, &format!("User '{}' was updated", user.user_name));
            Ok(see_other("/admin"))
        }
        Err(AdminError::Validation(errors)) => {
            // Redisplay what was submitted; the stored record is unchanged.
            let mut user = admin.find_for_edit(id).await.map_err(|e| match e {
                AdminError::App(e) => e,
                _ => AppError::NotFound,
            })?;
            user.email = form.email.trim().to_string();
            let ctx = PageContext::build(&session)?;
            render(UserEditTemplate { ctx, user, errors })
        }
        Err(e) => {
            let (errors, status) = messages_or_fail(e)?;
            render_index(&admin, &session, errors, status).await
        }
    }
}
