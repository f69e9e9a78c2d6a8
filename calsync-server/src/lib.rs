//! calsync-server: data service for scheduler/calendar UI widgets
//!
//! Exposes CRUD over two table families that share an Event/Resource shape:
//! - legacy `events` / `resources` (`/data` endpoints)
//! - `bryntum_scheduler_events` / `bryntum_scheduler_resources` (`/load`, `/sync`)
//!
//! Every endpoint answers HTTP 200 and signals failure through a
//! `success: false` field.

pub mod db;
pub mod http;
pub mod models;
pub mod sync;

pub use db::{DbError, LegacyRepository, SchedulerRepository};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
