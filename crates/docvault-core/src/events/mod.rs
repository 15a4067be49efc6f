//! Events emitted when the in-memory tree changes.
//!
//! The coordinator publishes one [`TreeEvent`] per applied change; UI
//! layers subscribe and repaint from the latest snapshot.

pub mod tree;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use tree::TreeChange;

/// Wrapper for tree changes with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the change was applied.
    pub timestamp: DateTime<Utc>,
    /// Tree revision after the change.
    pub revision: u64,
    /// The change payload.
    pub change: TreeChange,
}

impl TreeEvent {
    /// Create a new tree event.
    pub fn new(revision: u64, change: TreeChange) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            revision,
            change,
        }
    }
}
