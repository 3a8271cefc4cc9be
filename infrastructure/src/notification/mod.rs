//! Notification bus adapters

mod broadcast;
mod tracing_bus;

pub use broadcast::{BroadcastNotificationBus, DEFAULT_CHANNEL_CAPACITY};
pub use tracing_bus::TracingNotificationBus;
