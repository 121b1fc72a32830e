// handlers/mod.rs - two security tiers
//
// public:    no authentication (/, /health)
// protected: bearer JWT + resolved user profile (/api/*)

pub mod protected;
pub mod public;
