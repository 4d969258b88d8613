pub mod admin_handlers;
pub mod auth_handlers;
