//! Database layer - connection pool, schema, migrations and repositories
//!
//! # Design Principles
//!
//! - Connection pool shared by all requests - no per-request connections
//! - Column names come from a static allow-list per table, never from the client
//! - Every value is bound as a parameter
//! - No transactions: each statement commits on its own

pub mod migrations;
pub mod pool;
pub mod record;
pub mod repos;
pub mod schema;

pub use pool::{create_pool, create_pool_with_options, DbConfig};
pub use record::{Record, SqlValue};
pub use repos::*;
pub use schema::{Column, ColumnKind, Entity, Table};
