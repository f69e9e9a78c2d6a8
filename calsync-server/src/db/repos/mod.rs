//! Repository interfaces for the two table families
//!
//! The legacy and scheduler families get separate traits: their schemas
//! overlap but are not guaranteed compatible, so nothing here bridges them.
//! Each trait has a MySQL implementation and an in-memory one for tests and
//! local development.

pub mod memory;
pub mod mysql;

use async_trait::async_trait;

use crate::db::{Entity, Record};
use crate::models::{EventRow, ResourceRow};

pub use memory::MemoryRepository;
pub use mysql::MySqlRepository;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("unknown column '{column}' for table {table}")]
    UnknownColumn { table: &'static str, column: String },

    #[error("invalid value for column '{column}': {reason}")]
    InvalidValue { column: String, reason: String },

    #[error("expected a JSON object for a {table} row")]
    NotAnObject { table: &'static str },
}

/// `events` / `resources`, served under `/data`
#[async_trait]
pub trait LegacyRepository: Send + Sync {
    async fn list_resources(&self) -> Result<Vec<ResourceRow>, DbError>;

    async fn list_events(&self) -> Result<Vec<EventRow>, DbError>;

    /// Insert an event and return the server-assigned id.
    async fn add_event(&self, event: &Record) -> Result<i64, DbError>;

    /// Update by id. Matching zero rows is not an error.
    async fn update_event(&self, id: i64, event: &Record) -> Result<(), DbError>;

    /// Delete by id. Matching zero rows is not an error.
    async fn delete_event(&self, id: i64) -> Result<(), DbError>;
}

/// `bryntum_scheduler_events` / `bryntum_scheduler_resources`, served under
/// `/load` and `/sync`
#[async_trait]
pub trait SchedulerRepository: Send + Sync {
    async fn load_resources(&self) -> Result<Vec<ResourceRow>, DbError>;

    async fn load_events(&self) -> Result<Vec<EventRow>, DbError>;

    /// Insert a record and return the server-assigned id.
    async fn insert_record(&self, entity: Entity, record: &Record) -> Result<i64, DbError>;

    /// Update the given columns by id. An empty record is a no-op.
    async fn update_record(&self, entity: Entity, id: i64, record: &Record) -> Result<(), DbError>;

    /// Delete all ids in one statement, returning the number of rows removed.
    async fn remove_records(&self, entity: Entity, ids: &[i64]) -> Result<u64, DbError>;
}
