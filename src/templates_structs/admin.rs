use askama::Template;

use crate::models::user::{AppUser, CreateForm};
use super::PageContext;

#[derive(Template)]
#[template(path = "admin/index.html")]
pub struct UserListTemplate {
    pub ctx: PageContext,
    pub users: Vec<AppUser>,
    pub roles: Vec<String>,
    pub errors: Vec<String>,
}

/// Create form. On a failed post `form` carries the submitted values back;
/// the password is always blanked.
#[derive(Template)]
#[template(path = "admin/create.html")]
pub struct UserCreateTemplate {
    pub ctx: PageContext,
    pub form: CreateForm,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "admin/edit.html")]
pub struct UserEditTemplate {
    pub ctx: PageContext,
    pub user: AppUser,
    pub errors: Vec<String>,
}
