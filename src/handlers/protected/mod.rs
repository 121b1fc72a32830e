// handlers/protected/mod.rs - handlers behind jwt_auth_middleware + profile_middleware
//
// Every handler receives the caller's CurrentProfile as an extension. Services
// scope all reads and writes to its organization and apply the role policy.

pub mod briefings;
pub mod collaborations;
pub mod companies;
pub mod contacts;
pub mod dashboard;
pub mod me;
pub mod templates;
pub mod users;
