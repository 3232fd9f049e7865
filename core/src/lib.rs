//! sheetsync-core: reconcile a sales worksheet into the customer / sale / revenue tables.

pub mod config;
pub mod error;
pub mod layout;
pub mod report;
pub mod sheet;
pub mod store;
pub mod sync;
pub mod types;

pub use error::{SyncError, SyncResult};
pub use sync::{sync_sheet, SyncOptions};
