//! State-change notifications for real-time fan-out.
//!
//! Every event carries the full updated record; [`Notification`] adds the
//! server timestamp. Delivery is best-effort.

use crate::core::ids::{InitiativeId, MemberId};
use crate::initiative::Initiative;
use crate::resolution::VoteOutcome;
use crate::session::Session;
use crate::vote::{Tally, Vote};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A state change worth broadcasting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ChamberEvent {
    SessionActivated {
        session: Session,
    },
    SessionClosed {
        session: Session,
    },
    InitiativeOpened {
        initiative: Initiative,
    },
    InitiativeClosed {
        initiative: Initiative,
        tally: Tally,
        result: VoteOutcome,
    },
    /// A ballot was cast, overwritten or removed; `vote` is `None` on removal
    VoteUpdate {
        initiative_id: InitiativeId,
        voter_id: MemberId,
        vote: Option<Vote>,
        tally: Tally,
    },
}

impl ChamberEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ChamberEvent::SessionActivated { .. } => "session-activated",
            ChamberEvent::SessionClosed { .. } => "session-closed",
            ChamberEvent::InitiativeOpened { .. } => "initiative-opened",
            ChamberEvent::InitiativeClosed { .. } => "initiative-closed",
            ChamberEvent::VoteUpdate { .. } => "vote-update",
        }
    }
}

/// An event stamped with the server time it was emitted at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(flatten)]
    pub event: ChamberEvent,
    pub emitted_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(event: ChamberEvent, emitted_at: DateTime<Utc>) -> Self {
        Self { event, emitted_at }
    }

    pub fn name(&self) -> &'static str {
        self.event.name()
    }
}
