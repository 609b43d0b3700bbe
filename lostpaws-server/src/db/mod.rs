//! Database layer - connection pool, schema management, and repositories
//!
//! # Design Principles
//!
//! - Bounded connection pool; every operation acquires a connection,
//!   runs a single statement, and releases it on success and failure
//! - List operations use JOINs - no N+1 queries
//! - Constraint enforcement (unique e-mail, foreign keys, enum CHECKs)
//!   lives in the datastore; violations are classified, not pre-checked
//! - Rows are mapped to typed entities at the boundary

pub mod migrations;
pub mod pool;
pub mod repos;

pub use migrations::ensure_schema;
pub use pool::create_pool;
pub use repos::*;
