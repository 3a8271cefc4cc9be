//! Result of resolving an initiative

use serde::{Deserialize, Serialize};

/// Result recorded on an initiative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VoteOutcome {
    /// Not yet resolved
    #[default]
    Pending,
    Approved,
    Rejected,
    Tie,
    NoVotes,
}

impl VoteOutcome {
    pub fn as_str(&self) -> &str {
        match self {
            VoteOutcome::Pending => "pending",
            VoteOutcome::Approved => "approved",
            VoteOutcome::Rejected => "rejected",
            VoteOutcome::Tie => "tie",
            VoteOutcome::NoVotes => "no_votes",
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, VoteOutcome::Pending)
    }
}

impl std::fmt::Display for VoteOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
