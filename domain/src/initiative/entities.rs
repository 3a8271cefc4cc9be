//! Initiative domain entities

use crate::core::error::DomainError;
use crate::core::ids::{InitiativeId, MemberId, SessionId};
use crate::resolution::{MajorityType, VoteOutcome, compute_result};
use crate::vote::Tally;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of an initiative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InitiativeStatus {
    /// Waiting on the agenda
    #[default]
    Pending,
    /// Accepting votes
    Open,
    /// Resolved; terminal
    Closed,
}

impl InitiativeStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InitiativeStatus::Pending => "pending",
            InitiativeStatus::Open => "open",
            InitiativeStatus::Closed => "closed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, InitiativeStatus::Closed)
    }
}

impl std::fmt::Display for InitiativeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Agenda item descriptor supplied by the ingestion collaborator
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewInitiative {
    pub title: String,
    pub description: Option<String>,
    pub presenter: Option<String>,
    pub party: Option<String>,
    /// Defaults to [`MajorityType::Simple`] when unspecified
    pub majority_type: Option<MajorityType>,
}

impl NewInitiative {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_presenter(mut self, presenter: impl Into<String>) -> Self {
        self.presenter = Some(presenter.into());
        self
    }

    pub fn with_party(mut self, party: impl Into<String>) -> Self {
        self.party = Some(party.into());
        self
    }

    pub fn with_majority(mut self, majority: MajorityType) -> Self {
        self.majority_type = Some(majority);
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("initiative title cannot be empty"));
        }
        Ok(())
    }
}

/// A single agenda item, resolved by a roll-call vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Initiative {
    pub id: InitiativeId,
    /// Owning session; never changes
    pub session_id: SessionId,
    /// Presentation order, unique within the session
    pub ordinal: u32,
    pub title: String,
    pub description: Option<String>,
    pub presenter: Option<String>,
    pub party: Option<String>,
    pub majority_type: MajorityType,
    pub status: InitiativeStatus,
    pub result: VoteOutcome,
    /// Cached counts, rebuilt from the ledger at closure
    pub favor: u32,
    pub against: u32,
    pub abstain: u32,
    /// Eligible count the resolution was computed against
    pub eligible_at_close: Option<u32>,
    pub opened_at: Option<DateTime<Utc>>,
    pub opened_by: Option<MemberId>,
    pub closed_at: Option<DateTime<Utc>>,
    pub closed_by: Option<MemberId>,
}

impl Initiative {
    pub fn create(
        id: InitiativeId,
        session_id: SessionId,
        ordinal: u32,
        new: NewInitiative,
    ) -> Self {
        Self {
            id,
            session_id,
            ordinal,
            title: new.title.trim().to_string(),
            description: new.description,
            presenter: new.presenter,
            party: new.party,
            majority_type: new.majority_type.unwrap_or_default(),
            status: InitiativeStatus::Pending,
            result: VoteOutcome::Pending,
            favor: 0,
            against: 0,
            abstain: 0,
            eligible_at_close: None,
            opened_at: None,
            opened_by: None,
            closed_at: None,
            closed_by: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == InitiativeStatus::Open
    }

    pub fn is_closed(&self) -> bool {
        self.status == InitiativeStatus::Closed
    }

    /// Start accepting votes.
    ///
    /// The caller demotes any other open initiative of the session first.
    pub fn open(&mut self, actor: &MemberId, now: DateTime<Utc>) -> Result<(), DomainError> {
        match self.status {
            InitiativeStatus::Open => Err(DomainError::InitiativeAlreadyOpen(self.id)),
            InitiativeStatus::Closed => Err(DomainError::InitiativeAlreadyClosed(self.id)),
            InitiativeStatus::Pending => {
                self.status = InitiativeStatus::Open;
                self.opened_at = Some(now);
                self.opened_by = Some(actor.clone());
                Ok(())
            }
        }
    }

    /// Resolve and close.
    ///
    /// The cached counts are replaced wholesale by `tally`, which must be
    /// computed from the ledger in the same write.
    pub fn close(
        &mut self,
        tally: &Tally,
        eligible_count: u32,
        actor: &MemberId,
        now: DateTime<Utc>,
    ) -> Result<VoteOutcome, DomainError> {
        if self.is_closed() {
            return Err(DomainError::InitiativeAlreadyClosed(self.id));
        }

        let result = compute_result(self.majority_type, tally, eligible_count);

        self.favor = tally.favor;
        self.against = tally.against;
        self.abstain = tally.abstain;
        self.eligible_at_close = Some(eligible_count);
        self.result = result;
        self.status = InitiativeStatus::Closed;
        self.closed_at = Some(now);
        self.closed_by = Some(actor.clone());
        Ok(result)
    }

    /// Reject ballots unless voting is open
    pub fn ensure_accepts_votes(&self) -> Result<(), DomainError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(DomainError::InitiativeNotOpen(self.id))
        }
    }

    /// Guard for ledger corrections
    pub fn ensure_ledger_mutable(&self) -> Result<(), DomainError> {
        match self.status {
            InitiativeStatus::Open => Ok(()),
            InitiativeStatus::Closed => Err(DomainError::InitiativeAlreadyClosed(self.id)),
            InitiativeStatus::Pending => Err(DomainError::InitiativeNotOpen(self.id)),
        }
    }

    /// Counts cached at closure
    pub fn cached_tally(&self) -> Tally {
        Tally::new(self.favor, self.against, self.abstain)
    }
}
