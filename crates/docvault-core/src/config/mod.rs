//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod api;
pub mod logging;
pub mod tree;
pub mod upload;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use self::api::ApiConfig;
pub use self::logging::LoggingConfig;
pub use self::tree::TreeConfig;
pub use self::upload::UploadConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Document-storage API settings.
    #[serde(default)]
    #[validate(nested)]
    pub api: ApiConfig,
    /// Tree and coordinator settings.
    #[serde(default)]
    #[validate(nested)]
    pub tree: TreeConfig,
    /// Upload settings.
    #[serde(default)]
    #[validate(nested)]
    pub upload: UploadConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `{dir}/default.toml` with an environment-specific overlay
    /// `{dir}/{env}.toml` and environment variables prefixed with
    /// `DOCVAULT__`. Both files are optional.
    pub fn load(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DOCVAULT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        parsed.validate().map_err(|e| {
            AppError::configuration(format!("Invalid configuration: {e}"))
        })?;

        tracing::debug!(
            base_url = %parsed.api.base_url,
            copy_suffix = %parsed.tree.copy_suffix,
            "Configuration loaded"
        );

        Ok(parsed)
    }
}
