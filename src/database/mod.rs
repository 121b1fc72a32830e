pub mod manager;
pub mod query_builder;
pub mod repository;
pub mod models;

pub use manager::{DatabaseError, DatabaseManager};
pub use repository::Repository;
