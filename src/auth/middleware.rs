use actix_session::SessionExt;
use actix_web::{
    Error,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web,
};

use super::session::{Roles, get_user_id, set_roles};
use crate::admin::UserAdmin;
use crate::errors::{AppError, see_other};

/// Sends anonymous callers to /login. A signed-in session must still
/// resolve to a stored user: deleted accounts are signed out, and the
/// cached roles are re-read so `session::require_role` sees grants and
/// revocations made since login.
pub async fn require_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let session = req.get_session();
    let Some(user_id) = get_user_id(&session) else {
        log::debug!("Anonymous request to {} redirected to /login", req.path());
        return Ok(req.into_response(see_other("/login")).map_into_right_body());
    };

    let admin = req
        .app_data::<web::Data<UserAdmin>>()
        .cloned()
        .ok_or_else(|| AppError::Config("UserAdmin is not registered as app data".to_string()))?;
    let users = admin.user_manager();

    match users.find_by_id(user_id).await? {
        Some(user) => {
            let roles = Roles(users.get_roles(&user).await?);
            set_roles(&session, &roles)?;
        }
        None => {
            log::warn!("Session for deleted user id {user_id} purged");
            session.purge();
            return Ok(req.into_response(see_other("/login")).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}
