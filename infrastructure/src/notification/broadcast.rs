//! Real-time fan-out over a tokio broadcast channel.

use chamber_application::NotificationBus;
use chamber_domain::Notification;
use tokio::sync::broadcast;
use tracing::trace;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Publishes every notification to all current subscribers.
///
/// Sending never blocks. With no subscribers the notification is dropped;
/// a subscriber that falls more than `capacity` behind sees `Lagged` and
/// skips ahead.
pub struct BroadcastNotificationBus {
    sender: broadcast::Sender<Notification>,
}

impl BroadcastNotificationBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastNotificationBus {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl NotificationBus for BroadcastNotificationBus {
    fn publish(&self, notification: Notification) {
        let name = notification.name();
        if self.sender.send(notification).is_err() {
            trace!("No subscribers for {}", name);
        }
    }
}
