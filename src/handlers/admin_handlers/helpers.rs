use actix_session::Session;
use actix_web::{HttpResponse, http::StatusCode};

use crate::admin::{AdminError, UserAdmin};
use crate::errors::{AppError, render_with_status};
use crate::templates_structs::{PageContext, UserListTemplate};

/// Split a facade error into form messages plus status, or pass the
/// infrastructure error through.
pub fn messages_or_fail(err: AdminError) -> Result<(Vec<String>, StatusCode), AppError> {
    match err {
        AdminError::App(e) => Err(e),
        AdminError::NotFound => Ok((err.messages(), StatusCode::NOT_FOUND)),
        AdminError::Validation(errors) => Ok((errors, StatusCode::OK)),
    }
}

/// The listing page, optionally annotated with error messages.
pub async fn render_index(
    admin: &UserAdmin,
    session: &Session,
    errors: Vec<String>,
    status: StatusCode,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(session)?;
    let users = admin.list().await?;
    let roles = admin.list_roles().await?;
    render_with_status(UserListTemplate { ctx, users, roles, errors }, status)
}
