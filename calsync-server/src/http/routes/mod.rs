//! Route handlers organized by table family

pub mod health;
pub mod legacy;
pub mod scheduler;
