//! Row and payload types shared by both table families
//!
//! Rows serialize with the camelCase column names the widget expects.

pub mod event;
pub mod resource;
pub mod sync;

pub use event::EventRow;
pub use resource::ResourceRow;
pub use sync::{GroupRows, PhantomMapping, SyncRequest, SyncResponse, TableChanges};
