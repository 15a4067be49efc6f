//! Tree behaviour configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Settings for the in-memory tree and the operation coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TreeConfig {
    /// Suffix appended to a folder copied into its own parent.
    #[serde(default = "default_copy_suffix")]
    #[validate(length(min = 1))]
    pub copy_suffix: String,
    /// Whether archives start expanded after hydration.
    #[serde(default = "default_true")]
    pub expand_on_load: bool,
    /// Capacity of the tree event broadcast channel.
    #[serde(default = "default_event_buffer")]
    #[validate(range(min = 1, max = 65536))]
    pub event_buffer: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            copy_suffix: default_copy_suffix(),
            expand_on_load: default_true(),
            event_buffer: default_event_buffer(),
        }
    }
}

fn default_copy_suffix() -> String {
    " - copy".to_string()
}

fn default_true() -> bool {
    true
}

fn default_event_buffer() -> usize {
    64
}
