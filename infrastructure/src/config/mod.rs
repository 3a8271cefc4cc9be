//! Configuration file loading for chamber-vote
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CHAMBER_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./chamber.toml` or `./.chamber.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/chamber-vote/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileLoggingConfig, FileMemberConfig,
    FileNotificationsConfig, FileOutputConfig, FileOutputFormat, FileStorageConfig,
};
pub use loader::ConfigLoader;
