pub mod create;
pub mod delete;
pub mod edit;
pub mod helpers;
pub mod list;
pub mod roles;

pub use self::create::{create, new_form};
pub use self::delete::delete;
pub use self::edit::{edit_form, update};
pub use self::list::list;
pub use self::roles::{add_user_to_role, user_roles};
