//! Sync Engine: mirror the shared rule tree into the working directory
//!
//! A run walks `Idle → CacheReady → BackedUp → Copied → Restored → Done`.
//! Protected files in the working tree survive the copy because they are
//! captured before it and written back after it. Nothing is rolled back on
//! failure; running again converges.

mod engine;
mod report;

pub use engine::{SyncEngine, SyncOptions, SyncState};
pub use report::SyncReport;
