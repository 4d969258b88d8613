pub mod csrf;
pub mod middleware;
pub mod password;
pub mod session;
