mod admin;
mod ai;
mod auth;
mod task;

pub use admin::list_users;
pub use ai::generate;
pub use auth::{handle_register, handle_login, current_user};
pub use task::{list_tasks, create_task, update_task, delete_task};
