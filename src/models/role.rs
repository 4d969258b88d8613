use serde::Serialize;

/// Named permission group. Users reference roles by name.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

/// Role every facade operation requires.
pub const ADMIN_ROLE: &str = "Admin";

/// Form data from the "add user to role" form on the listing page.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AddToRoleForm {
    pub user_name: String,
    pub role_name: String,
    pub csrf_token: String,
}

/// Query for `GET /admin/roles`.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct UserRolesQuery {
    pub user_name: String,
}
