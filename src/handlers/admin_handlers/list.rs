use actix_session::Session;
use actix_web::{HttpResponse, http::StatusCode, web};

use super::helpers::render_index;
use crate::admin::UserAdmin;
use crate::auth::session::require_role;
use crate::errors::AppError;
use crate::models::role::ADMIN_ROLE;

/// GET /admin
pub async fn list(admin: web::Data<UserAdmin>, session: Session) -> Result<HttpResponse, AppError> {
    require_role(&session, ADMIN_ROLE)?;
    render_index(&admin, &session, vec![], StatusCode::OK).await
}
