//! Upload reconciliation configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Settings for multi-file uploads.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UploadConfig {
    /// Maximum number of files accepted in one batch.
    #[serde(default = "default_max_files")]
    #[validate(range(min = 1, max = 1000))]
    pub max_files_per_batch: usize,
    /// How long the success notice stays visible, in seconds.
    #[serde(default = "default_success_notice")]
    #[validate(range(min = 1))]
    pub success_notice_seconds: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_files_per_batch: default_max_files(),
            success_notice_seconds: default_success_notice(),
        }
    }
}

fn default_max_files() -> usize {
    50
}

fn default_success_notice() -> u64 {
    5
}
