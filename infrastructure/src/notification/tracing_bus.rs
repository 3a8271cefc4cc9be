use chamber_application::NotificationBus;
use chamber_domain::{ChamberEvent, Notification};
use tracing::debug;

/// Writes each notification to the operation log at debug level
pub struct TracingNotificationBus;

impl NotificationBus for TracingNotificationBus {
    fn publish(&self, notification: Notification) {
        match &notification.event {
            ChamberEvent::SessionActivated { session } | ChamberEvent::SessionClosed { session } => {
                debug!(session = %session.id, state = %session.state, "{}", notification.name());
            }
            ChamberEvent::InitiativeOpened { initiative } => {
                debug!(initiative = %initiative.id, "{}", notification.name());
            }
            ChamberEvent::InitiativeClosed { initiative, tally, result } => {
                debug!(
                    initiative = %initiative.id,
                    favor = tally.favor,
                    against = tally.against,
                    abstain = tally.abstain,
                    result = %result,
                    "{}",
                    notification.name()
                );
            }
            ChamberEvent::VoteUpdate { initiative_id, voter_id, vote, tally } => {
                debug!(
                    initiative = %initiative_id,
                    voter = %voter_id,
                    removed = vote.is_none(),
                    total = tally.total,
                    "{}",
                    notification.name()
                );
            }
        }
    }
}
