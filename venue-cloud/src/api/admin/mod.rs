//! Platform admin API

mod auth;
mod invitations;
mod login_logs;
mod settings;

pub use auth::{LOGIN_ACTION, login, logout, session};
pub use invitations::delete_invitation;
pub use login_logs::list_login_logs;
pub use settings::{get_settings, update_settings, validate_update};
