//! User accounts and cookie based authentication.
//!
//! Log-in state is stored client-side as an encrypted private cookie holding a
//! [token::Token]. The [auth_guard] and [auth_guard_hx] middleware validate the
//! cookie and make the [UserID] available to route handlers as a request
//! extension.

pub(crate) mod cookie;
mod forgot_password;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod register;
mod token;
mod user;

pub(crate) use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use forgot_password::get_forgot_password_page;
pub use log_in::{LogInState, get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub use password::PasswordHash;
pub use register::{RegisterState, get_register_page, register_user};
pub use user::{User, UserID, create_user, create_user_table, get_user_by_email};
