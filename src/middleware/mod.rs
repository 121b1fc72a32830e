pub mod auth;
pub mod profile;
pub mod response;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use profile::{profile_middleware, CurrentProfile};
pub use response::{ApiResponse, ApiResult};
