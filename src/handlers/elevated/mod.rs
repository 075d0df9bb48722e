// handlers/elevated/mod.rs - endpoints behind `protect` + `require_admin`
pub mod admin;
pub mod agents;

pub use admin::{dashboard, users_list};
pub use agents::{agent_create, agent_delete, agent_update, agent_upload};
