use actix_session::Session;
use actix_web::{HttpResponse, web};

use super::helpers::messages_or_fail;
use crate::admin::{NewUserRequest, UserAdmin};
use crate::auth::csrf;
use crate::auth::session::{require_role, set_flash};
use crate::errors::{AppError, render, see_other};
use crate::models::role::ADMIN_ROLE;
use crate::models::user::CreateForm;
use crate::templates_structs::{PageContext, UserCreateTemplate};

/// GET /admin/create
pub async fn new_form(session: Session) -> Result<HttpResponse, AppError> {
    require_role(&session, ADMIN_ROLE)?;

    let ctx = PageContext::build(&session)?;
    render(UserCreateTemplate { ctx, form: CreateForm::default(), errors: vec![] })
}

/// POST /admin/create
pub async fn create(
    admin: web::Data<UserAdmin>,
    session: Session,
    form: web::Form<CreateForm>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, ADMIN_ROLE)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let mut form = form.into_inner();
    let missing = form.missing_fields();
    if !missing.is_empty() {
        return redisplay(&session, form, missing);
    }

    let req = NewUserRequest {
        name: form.name.clone(),
        email: form.email.clone(),
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        password: std::mem::take(&mut form.password),
    };

    match admin.create(&req).await {
        Ok(user) => {
            set_flash(&session, &format!("User '{}' was created", user.user_name));
            Ok(see_other("/admin"))
        }
        Err(e) => {
            let (errors, _) = messages_or_fail(e)?;
            redisplay(&session, form, errors)
        }
    }
}

fn redisplay(session: &Session, mut form: CreateForm, errors: Vec<String>) -> Result<HttpResponse, AppError> {
    form.password.clear();
    let ctx = PageContext::build(session)?;
    render(UserCreateTemplate { ctx, form, errors })
}
