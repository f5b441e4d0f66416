//! # Factory Cache
//!
//! 衍生結果快取與增量重算模組

pub mod dirty_tracking;
pub mod generation;
pub mod incremental;

// Re-export 主要類型
pub use dirty_tracking::DirtyTracker;
pub use generation::{PassTicket, PassTracker};
pub use incremental::{AppliedMutation, IncrementalPlanner, Mutation};
