//! Infrastructure layer for chamber-vote
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod audit;
pub mod config;
pub mod notification;
pub mod store;

// Re-export commonly used types
pub use audit::{InMemoryAuditLog, JsonlAuditLog};
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileLoggingConfig, FileMemberConfig,
    FileNotificationsConfig, FileOutputConfig, FileOutputFormat, FileStorageConfig,
};
pub use notification::{BroadcastNotificationBus, DEFAULT_CHANNEL_CAPACITY, TracingNotificationBus};
pub use store::InMemoryChamberStore;
