//! # Refresh Status
//!
//! Summary of the store's committed state.

use crate::domain::value_objects::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// Record count and the commit time of the most recent refresh.
///
/// Derived from the store on every read; never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RefreshStatus {
    /// Number of stored country records.
    pub count: u64,
    /// When the last successful refresh committed, if any has.
    pub last_refreshed_at: Option<Timestamp>,
}

impl RefreshStatus {
    /// Status of a store that has never been refreshed.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}
