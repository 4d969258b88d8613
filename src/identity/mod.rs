// Identity layer: users, roles, validation and password hashing over a
// pluggable `UserStore`.

pub mod manager;
pub mod memory;
pub mod postgres;
pub mod result;
pub mod roles;
pub mod store;
pub mod validators;

pub use manager::UserManager;
pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;
pub use result::{IdentityError, IdentityResult};
pub use roles::RoleManager;
pub use store::UserStore;
pub use validators::{PasswordOptions, PasswordValidator, UserValidator};
