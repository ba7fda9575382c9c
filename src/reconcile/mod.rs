//! Transaction reconciliation
//!
//! Exactly-once persistence of completed orders and recovery of late
//! completion signals for orders the client saw expire.

pub mod error;
pub mod reconciler;
pub mod tracker;

pub use error::ReconcileError;
pub use reconciler::{Reconciler, RecoveryOutcome, SaveOutcome, SkipReason};
pub use tracker::{OrderTracker, RecoveryState};
