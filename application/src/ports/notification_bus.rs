//! Port for broadcasting state changes to real-time collaborators.
//!
//! `publish` is synchronous and non-fallible: a transport failure must never
//! block, retry or roll back the transition that produced the event.
//! Adapters swallow (and log) delivery errors.

use chamber_domain::Notification;
use std::sync::Arc;

/// Fire-and-forget broadcast of chamber events
pub trait NotificationBus: Send + Sync {
    fn publish(&self, notification: Notification);
}

/// No-op implementation for tests and when nobody listens.
pub struct NoNotifications;

impl NotificationBus for NoNotifications {
    fn publish(&self, _notification: Notification) {}
}

/// A bus that delegates to multiple inner buses.
///
/// ```text
/// use case ──publish──► CompositeNotificationBus
///                          ├──► BroadcastNotificationBus → realtime subscribers
///                          └──► TracingNotificationBus   → operation log
/// ```
pub struct CompositeNotificationBus {
    delegates: Vec<Arc<dyn NotificationBus>>,
}

impl CompositeNotificationBus {
    pub fn new(delegates: Vec<Arc<dyn NotificationBus>>) -> Self {
        Self { delegates }
    }
}

impl NotificationBus for CompositeNotificationBus {
    fn publish(&self, notification: Notification) {
        for d in &self.delegates {
            d.publish(notification.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chamber_domain::{ChamberEvent, NewSession, Session, SessionId};
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingBus {
        count: Mutex<usize>,
    }

    impl NotificationBus for CountingBus {
        fn publish(&self, _notification: Notification) {
            *self.count.lock().unwrap() += 1;
        }
    }

    #[test]
    fn test_composite_delivers_to_every_delegate() {
        let first = Arc::new(CountingBus::default());
        let second = Arc::new(CountingBus::default());
        let delegates: Vec<Arc<dyn NotificationBus>> =
            vec![first.clone(), second.clone(), Arc::new(NoNotifications)];
        let composite = CompositeNotificationBus::new(delegates);

        let session = Session::create(SessionId::new(1), NewSession::new("S", "Sitting"), Utc::now());
        composite.publish(Notification::new(
            ChamberEvent::SessionClosed { session },
            Utc::now(),
        ));

        assert_eq!(*first.count.lock().unwrap(), 1);
        assert_eq!(*second.count.lock().unwrap(), 1);
    }
}
