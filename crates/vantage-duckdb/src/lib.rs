pub mod backend;
pub mod pageview;
pub mod queries;
pub mod salt;
pub mod schema;

pub use backend::DuckDbBackend;

// Re-export so dependents use the same duckdb version (params! in tests).
pub use duckdb;
