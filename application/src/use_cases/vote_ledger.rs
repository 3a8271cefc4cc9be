//! Vote ledger use case
//!
//! Casting, correcting and reading ballots, plus the live tally.

use super::shared::{Sinks, now};
use crate::error::ChamberError;
use crate::ports::audit_log::AuditLog;
use crate::ports::chamber_store::ChamberStore;
use crate::ports::notification_bus::NotificationBus;
use chamber_domain::{
    AuditKind, ChamberEvent, DomainError, InitiativeId, Member, MemberId, Principal, Tally, Vote,
    VoteRecord, VoteValue, participation_rate,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Use case for the vote ledger and tally engine
pub struct VoteLedgerUseCase<S: ChamberStore + ?Sized> {
    store: Arc<S>,
    sinks: Sinks,
}

impl<S: ChamberStore + ?Sized> VoteLedgerUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            sinks: Sinks::default(),
        }
    }

    pub fn with_audit_log(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.sinks.audit = audit;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationBus>) -> Self {
        self.sinks.notifier = notifier;
        self
    }

    /// Cast or overwrite the principal's ballot on an open initiative.
    ///
    /// Last writer wins: a second cast replaces value and timestamp.
    pub async fn cast(
        &self,
        voter: &Principal,
        initiative_id: InitiativeId,
        value: &str,
    ) -> Result<Vote, ChamberError> {
        voter.require_eligible_voter()?;
        let value: VoteValue = match value.parse() {
            Ok(value) => value,
            Err(invalid) => {
                // A closed or pending initiative is reported before a bad value
                self.ensure_accepts_votes(initiative_id).await?;
                return Err(ChamberError::from(invalid));
            }
        };

        let vote = Vote::new(initiative_id, voter.id.clone(), value, now());
        let tally = self.store.upsert_vote(vote.clone()).await?;
        debug!(
            "{} voted {} on initiative {} (total {})",
            voter.id, value, initiative_id, tally.total
        );

        self.sinks.publish(ChamberEvent::VoteUpdate {
            initiative_id,
            voter_id: voter.id.clone(),
            vote: Some(vote.clone()),
            tally,
        });
        Ok(vote)
    }

    /// Delete a ballot while the initiative is open (administrators only).
    ///
    /// Returns whether a ballot existed.
    pub async fn remove(
        &self,
        actor: &Principal,
        initiative_id: InitiativeId,
        voter_id: &MemberId,
    ) -> Result<bool, ChamberError> {
        actor.require_administrator()?;

        let removal = self.store.delete_vote(initiative_id, voter_id).await?;
        if !removal.existed {
            debug!("No ballot from {} on initiative {}", voter_id, initiative_id);
            return Ok(false);
        }

        info!(
            "Ballot of {} on initiative {} removed by {}",
            voter_id, initiative_id, actor.id
        );
        self.sinks.audit(
            removal.initiative.session_id,
            AuditKind::VoteRemoved,
            format!(
                "Ballot of {} on item {} removed",
                voter_id, removal.initiative.ordinal
            ),
            &actor.id,
            now(),
        );
        self.sinks.publish(ChamberEvent::VoteUpdate {
            initiative_id,
            voter_id: voter_id.clone(),
            vote: None,
            tally: removal.tally,
        });
        Ok(true)
    }

    /// Ballots with voter identity, newest first
    pub async fn list_votes(
        &self,
        initiative_id: InitiativeId,
    ) -> Result<Vec<VoteRecord>, ChamberError> {
        self.ensure_initiative(initiative_id).await?;

        let roster: HashMap<MemberId, Member> = self
            .store
            .list_members()
            .await?
            .into_iter()
            .map(|m| (m.id.clone(), m))
            .collect();

        let votes = self.store.list_votes(initiative_id).await?;
        Ok(votes
            .into_iter()
            .map(|vote| {
                let voter = roster.get(&vote.voter_id).cloned();
                VoteRecord { vote, voter }
            })
            .collect())
    }

    /// Live tally; recomputed from the ballots on every call
    pub async fn tally(&self, initiative_id: InitiativeId) -> Result<Tally, ChamberError> {
        Ok(self.store.tally(initiative_id).await?)
    }

    /// Active legislators at call time
    pub async fn eligible_count(&self) -> Result<u32, ChamberError> {
        Ok(self.store.count_eligible_voters().await?)
    }

    /// Participation percentage for an initiative right now
    pub async fn participation(&self, initiative_id: InitiativeId) -> Result<u32, ChamberError> {
        let tally = self.tally(initiative_id).await?;
        let eligible = self.eligible_count().await?;
        Ok(participation_rate(&tally, eligible))
    }

    async fn ensure_accepts_votes(&self, initiative_id: InitiativeId) -> Result<(), ChamberError> {
        match self.store.find_initiative(initiative_id).await? {
            Some(initiative) => Ok(initiative.ensure_accepts_votes()?),
            None => Err(DomainError::InitiativeNotFound(initiative_id).into()),
        }
    }

    async fn ensure_initiative(&self, initiative_id: InitiativeId) -> Result<(), ChamberError> {
        match self.store.find_initiative(initiative_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::InitiativeNotFound(initiative_id).into()),
        }
    }
}
