//! Plumbing shared by the lifecycle use cases.

use crate::ports::audit_log::{AuditLog, NoAuditLog};
use crate::ports::notification_bus::{NoNotifications, NotificationBus};
use chamber_domain::{AuditKind, ChamberEvent, EventLogEntry, MemberId, Notification, SessionId};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// Where committed transitions are reported: the audit trail and the bus.
///
/// Both are called only after the store accepted the write.
#[derive(Clone)]
pub(crate) struct Sinks {
    pub(crate) audit: Arc<dyn AuditLog>,
    pub(crate) notifier: Arc<dyn NotificationBus>,
}

impl Default for Sinks {
    fn default() -> Self {
        Self {
            audit: Arc::new(NoAuditLog),
            notifier: Arc::new(NoNotifications),
        }
    }
}

impl Sinks {
    pub(crate) fn audit(
        &self,
        session_id: SessionId,
        kind: AuditKind,
        description: impl Into<String>,
        actor: &MemberId,
        at: DateTime<Utc>,
    ) {
        self.audit.append(EventLogEntry::new(
            session_id,
            kind,
            description,
            actor.clone(),
            at,
        ));
    }

    pub(crate) fn publish(&self, event: ChamberEvent) {
        debug!("Publishing {}", event.name());
        self.notifier.publish(Notification::new(event, now()));
    }
}

pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}
