pub mod auth;
pub mod extract;
pub mod response;

pub use auth::{bearer_or_cookie_token, protect, require_admin, AuthUser};
pub use extract::{ApiJson, ApiQuery};
pub use response::{ApiResponse, ApiResult};
