// handlers/public/mod.rs - endpoints that need no token
pub mod agents;
pub mod auth;
pub mod health;

pub use agents::{agent_show, agents_list};
pub use auth::{login, register};
pub use health::health;
