//! Idempotent branch synchronization against a [RefStore](crate::git::RefStore)

pub mod synchronizer;

pub use synchronizer::{BaseBranch, BranchSynchronizer, SyncOutcome};
