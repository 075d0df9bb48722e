// handlers/protected/mod.rs - endpoints behind `protect`
//
// Every handler here receives the caller as `Extension<AuthUser>`.
pub mod auth;
pub mod goals;
pub mod users;

pub use auth::{me, update_password};
pub use goals::{goals_get, goals_put};
pub use users::{
    address_add, address_delete, address_update, notifications_put, phone_add, phone_delete, phone_update,
    profile_get, profile_put,
};
