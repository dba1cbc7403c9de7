//! Remote sync extension point.
//!
//! # Responsibility
//! - Define the provider contract a future remote sync would implement.
//! - Ship a stub provider that reports its own unavailability.
//!
//! # Invariants
//! - Nothing in this module performs network I/O.

pub mod provider;

pub use provider::{StubSyncProvider, SyncConfig, SyncError, SyncProvider, SyncState, SyncStatus};
