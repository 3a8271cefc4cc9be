//! Read model summarising a session's agenda and results

use super::entities::Session;
use crate::initiative::{Initiative, InitiativeStatus};
use crate::resolution::VoteOutcome;
use crate::vote::Tally;
use serde::{Deserialize, Serialize};

/// One agenda line of a [`SessionReport`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiativeSummary {
    pub initiative: Initiative,
    /// Live while open, the cached counts otherwise
    pub tally: Tally,
    /// Against the eligible count at report time
    pub participation_rate: u32,
}

/// How many initiatives ended in each outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub approved: usize,
    pub rejected: usize,
    pub tie: usize,
    pub no_votes: usize,
    pub pending: usize,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: VoteOutcome) {
        match outcome {
            VoteOutcome::Approved => self.approved += 1,
            VoteOutcome::Rejected => self.rejected += 1,
            VoteOutcome::Tie => self.tie += 1,
            VoteOutcome::NoVotes => self.no_votes += 1,
            VoteOutcome::Pending => self.pending += 1,
        }
    }
}

/// Session with its full agenda, in ordinal order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session: Session,
    pub eligible_count: u32,
    pub initiatives: Vec<InitiativeSummary>,
    pub outcomes: OutcomeCounts,
}

impl SessionReport {
    pub fn new(session: Session, eligible_count: u32, mut initiatives: Vec<InitiativeSummary>) -> Self {
        initiatives.sort_by_key(|s| s.initiative.ordinal);

        let mut outcomes = OutcomeCounts::default();
        for summary in &initiatives {
            outcomes.record(summary.initiative.result);
        }

        Self {
            session,
            eligible_count,
            initiatives,
            outcomes,
        }
    }

    /// The initiative currently accepting votes, if any
    pub fn open_initiative(&self) -> Option<&InitiativeSummary> {
        self.initiatives
            .iter()
            .find(|s| s.initiative.status == InitiativeStatus::Open)
    }
}
