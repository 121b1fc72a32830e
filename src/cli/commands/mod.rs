pub mod collaborations;
pub mod health;
pub mod migrate;
pub mod token;
