pub mod agent_search;
pub mod profile_service;
pub mod upload;
pub mod validation;

pub use agent_search::{search_agents, AgentPage, AgentSearchParams};
pub use profile_service::{Dashboard, DashboardStats, ProfileError, ProfileService};
pub use upload::{UploadError, UploadStore};
pub use validation::FieldErrors;
