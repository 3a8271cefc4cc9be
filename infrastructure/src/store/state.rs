//! In-memory chamber state and its transitions.
//!
//! Each method validates and applies one store operation. Callers run them
//! against a draft copy under the store lock, so a rejected call leaves no
//! trace.

use chamber_application::{InitiativeOpening, SessionActivation, VoteRemoval};
use chamber_domain::{
    DomainError, Initiative, InitiativeId, Member, MemberId, NewInitiative, NewSession, Session,
    SessionId, Tally, Vote,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A ballot plus its write sequence, used for newest-first ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct LedgerEntry {
    pub vote: Vote,
    pub sequence: u64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ChamberState {
    pub(super) members: BTreeMap<MemberId, Member>,
    pub(super) sessions: BTreeMap<SessionId, Session>,
    pub(super) initiatives: BTreeMap<InitiativeId, Initiative>,
    pub(super) ledger: BTreeMap<(InitiativeId, MemberId), LedgerEntry>,
    pub(super) next_session_id: u64,
    pub(super) next_initiative_id: u64,
    pub(super) next_sequence: u64,
}

impl ChamberState {
    // ==================== Roster ====================

    pub fn upsert_member(&mut self, member: Member) {
        self.members.insert(member.id.clone(), member);
    }

    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.get(id)
    }

    pub fn members(&self) -> Vec<Member> {
        self.members.values().cloned().collect()
    }

    pub fn eligible_count(&self) -> u32 {
        self.members
            .values()
            .filter(|m| m.is_eligible_voter())
            .count() as u32
    }

    // ==================== Sessions ====================

    pub fn session(&self, id: SessionId) -> Result<&Session, DomainError> {
        self.sessions
            .get(&id)
            .ok_or(DomainError::SessionNotFound(id))
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.sessions.values().cloned().collect()
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.sessions.values().find(|s| s.is_active())
    }

    pub fn insert_session(
        &mut self,
        new: NewSession,
        now: DateTime<Utc>,
    ) -> Result<Session, DomainError> {
        new.validate()?;
        let code = new.code.trim();
        if self
            .sessions
            .values()
            .any(|s| s.code.eq_ignore_ascii_case(code))
        {
            return Err(DomainError::CodeAlreadyExists(code.to_string()));
        }

        self.next_session_id += 1;
        let session = Session::create(SessionId::new(self.next_session_id), new, now);
        self.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    pub fn activate_session(
        &mut self,
        id: SessionId,
        actor: &MemberId,
        now: DateTime<Utc>,
    ) -> Result<SessionActivation, DomainError> {
        let mut session = self.session(id)?.clone();
        session.activate(actor, now)?;
        Ok(self.install_active(session))
    }

    pub fn resume_session(&mut self, id: SessionId) -> Result<SessionActivation, DomainError> {
        let mut session = self.session(id)?.clone();
        session.resume()?;
        Ok(self.install_active(session))
    }

    pub fn pause_session(&mut self, id: SessionId) -> Result<Session, DomainError> {
        let mut session = self.session(id)?.clone();
        session.pause()?;
        self.sessions.insert(id, session.clone());
        Ok(session)
    }

    pub fn close_session(
        &mut self,
        id: SessionId,
        actor: &MemberId,
        now: DateTime<Utc>,
    ) -> Result<Session, DomainError> {
        let mut session = self.session(id)?.clone();
        let open = self
            .initiatives
            .values()
            .filter(|i| i.session_id == id && i.is_open())
            .count();
        session.close(actor, now, open)?;
        self.sessions.insert(id, session.clone());
        Ok(session)
    }

    /// Store `session` as the single active one, suspending the previous holder
    fn install_active(&mut self, session: Session) -> SessionActivation {
        let mut suspended = Vec::new();
        for other in self.sessions.values_mut() {
            if other.id != session.id && other.is_active() {
                other.suspend();
                suspended.push(other.clone());
            }
        }
        self.sessions.insert(session.id, session.clone());
        SessionActivation { session, suspended }
    }

    // ==================== Initiatives ====================

    pub fn initiative(&self, id: InitiativeId) -> Result<&Initiative, DomainError> {
        self.initiatives
            .get(&id)
            .ok_or(DomainError::InitiativeNotFound(id))
    }

    pub fn initiatives_of(&self, session_id: SessionId) -> Vec<Initiative> {
        let mut items: Vec<Initiative> = self
            .initiatives
            .values()
            .filter(|i| i.session_id == session_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.ordinal);
        items
    }

    pub fn insert_initiatives(
        &mut self,
        session_id: SessionId,
        items: Vec<NewInitiative>,
    ) -> Result<Vec<Initiative>, DomainError> {
        let session = self.session(session_id)?;
        if session.is_closed() {
            return Err(DomainError::SessionAlreadyClosed(session_id));
        }
        for item in &items {
            item.validate()?;
        }

        let mut ordinal = self
            .initiatives
            .values()
            .filter(|i| i.session_id == session_id)
            .map(|i| i.ordinal)
            .max()
            .unwrap_or(0);

        let mut created = Vec::with_capacity(items.len());
        for item in items {
            ordinal += 1;
            self.next_initiative_id += 1;
            let initiative = Initiative::create(
                InitiativeId::new(self.next_initiative_id),
                session_id,
                ordinal,
                item,
            );
            self.initiatives.insert(initiative.id, initiative.clone());
            created.push(initiative);
        }
        Ok(created)
    }

    pub fn open_initiative(
        &mut self,
        id: InitiativeId,
        actor: &MemberId,
        now: DateTime<Utc>,
    ) -> Result<InitiativeOpening, DomainError> {
        let mut initiative = self.initiative(id)?.clone();
        initiative.open(actor, now)?;

        let session = self.session(initiative.session_id)?;
        if session.is_closed() {
            return Err(DomainError::SessionAlreadyClosed(session.id));
        }
        if !session.is_active() {
            return Err(DomainError::SessionNotActive(session.id));
        }

        let others: Vec<InitiativeId> = self
            .initiatives
            .values()
            .filter(|i| i.session_id == initiative.session_id && i.id != id && i.is_open())
            .map(|i| i.id)
            .collect();
        let mut demoted = Vec::with_capacity(others.len());
        for other in others {
            demoted.push(self.close_initiative(other, actor, now)?);
        }

        self.initiatives.insert(id, initiative.clone());
        Ok(InitiativeOpening {
            initiative,
            demoted,
        })
    }

    pub fn close_initiative(
        &mut self,
        id: InitiativeId,
        actor: &MemberId,
        now: DateTime<Utc>,
    ) -> Result<Initiative, DomainError> {
        let mut initiative = self.initiative(id)?.clone();
        let tally = self.ledger_tally(id);
        let eligible = self.eligible_count();
        initiative.close(&tally, eligible, actor, now)?;
        self.initiatives.insert(id, initiative.clone());
        Ok(initiative)
    }

    // ==================== Votes ====================

    pub fn upsert_vote(&mut self, vote: Vote) -> Result<Tally, DomainError> {
        self.initiative(vote.initiative_id)?.ensure_accepts_votes()?;
        if self.member(&vote.voter_id).is_none() {
            return Err(DomainError::MemberNotFound(vote.voter_id));
        }

        self.next_sequence += 1;
        let key = (vote.initiative_id, vote.voter_id.clone());
        let initiative_id = vote.initiative_id;
        self.ledger.insert(
            key,
            LedgerEntry {
                vote,
                sequence: self.next_sequence,
            },
        );
        Ok(self.ledger_tally(initiative_id))
    }

    pub fn delete_vote(
        &mut self,
        initiative_id: InitiativeId,
        voter_id: &MemberId,
    ) -> Result<VoteRemoval, DomainError> {
        let initiative = self.initiative(initiative_id)?.clone();
        initiative.ensure_ledger_mutable()?;

        let existed = self
            .ledger
            .remove(&(initiative_id, voter_id.clone()))
            .is_some();
        Ok(VoteRemoval {
            tally: self.ledger_tally(initiative_id),
            initiative,
            existed,
        })
    }

    /// Ballots of an initiative, newest first
    pub fn votes_of(&self, initiative_id: InitiativeId) -> Result<Vec<Vote>, DomainError> {
        self.initiative(initiative_id)?;
        let mut entries: Vec<&LedgerEntry> = self
            .ledger_range(initiative_id)
            .collect();
        entries.sort_by(|a, b| b.sequence.cmp(&a.sequence));
        Ok(entries.into_iter().map(|e| e.vote.clone()).collect())
    }

    pub fn tally(&self, initiative_id: InitiativeId) -> Result<Tally, DomainError> {
        let initiative = self.initiative(initiative_id)?;
        if initiative.is_closed() {
            return Ok(initiative.cached_tally());
        }
        Ok(self.ledger_tally(initiative_id))
    }

    fn ledger_tally(&self, initiative_id: InitiativeId) -> Tally {
        Tally::from_values(self.ledger_range(initiative_id).map(|e| e.vote.value))
    }

    fn ledger_range(&self, initiative_id: InitiativeId) -> impl Iterator<Item = &LedgerEntry> {
        self.ledger
            .iter()
            .filter(move |((id, _), _)| *id == initiative_id)
            .map(|(_, entry)| entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chamber_domain::{
        ErrorKind, InitiativeStatus, MajorityType, Role, SessionState, VoteOutcome, VoteValue,
    };

    fn op() -> MemberId {
        MemberId::new("op")
    }

    fn state_with_roster(legislators: usize) -> ChamberState {
        let mut state = ChamberState::default();
        for n in 0..legislators {
            state.upsert_member(Member::new(
                format!("leg-{n}"),
                format!("Legislator {n}"),
                Role::Legislator,
            ));
        }
        state.upsert_member(Member::new("op", "Clerk", Role::Operator));
        state
    }

    fn active_session(state: &mut ChamberState, code: &str) -> SessionId {
        let id = state
            .insert_session(NewSession::new(code, "Sitting"), Utc::now())
            .unwrap()
            .id;
        state.activate_session(id, &op(), Utc::now()).unwrap();
        id
    }

    fn vote(initiative: InitiativeId, voter: &str, value: VoteValue) -> Vote {
        Vote::new(initiative, voter, value, Utc::now())
    }

    #[test]
    fn test_eligible_count_ignores_inactive_and_staff() {
        let mut state = state_with_roster(3);
        state.upsert_member(Member::new("leg-x", "Retired", Role::Legislator).inactive());
        assert_eq!(state.eligible_count(), 3);
    }

    #[test]
    fn test_session_code_is_unique() {
        let mut state = ChamberState::default();
        state
            .insert_session(NewSession::new("S-01", "First"), Utc::now())
            .unwrap();
        let err = state
            .insert_session(NewSession::new("s-01", "Again"), Utc::now())
            .unwrap_err();
        assert_eq!(err, DomainError::CodeAlreadyExists("s-01".to_string()));
        assert_eq!(state.sessions().len(), 1);
    }

    #[test]
    fn test_activation_suspends_previous_active() {
        let mut state = ChamberState::default();
        let first = active_session(&mut state, "S-01");
        let second = state
            .insert_session(NewSession::new("S-02", "Second"), Utc::now())
            .unwrap()
            .id;

        let activation = state.activate_session(second, &op(), Utc::now()).unwrap();
        assert_eq!(activation.suspended.len(), 1);
        assert_eq!(activation.suspended[0].id, first);
        assert_eq!(state.session(first).unwrap().state, SessionState::Paused);
        assert_eq!(state.active_session().map(|s| s.id), Some(second));
    }

    #[test]
    fn test_ordinals_continue_on_append() {
        let mut state = ChamberState::default();
        let session = active_session(&mut state, "S-01");
        let first = state
            .insert_initiatives(
                session,
                vec![NewInitiative::new("A"), NewInitiative::new("B")],
            )
            .unwrap();
        let later = state
            .insert_initiatives(session, vec![NewInitiative::new("C")])
            .unwrap();

        assert_eq!(first.iter().map(|i| i.ordinal).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(later[0].ordinal, 3);
        assert_eq!(state.initiatives_of(session).len(), 3);
    }

    #[test]
    fn test_batch_rejected_as_a_whole() {
        let mut state = ChamberState::default();
        let session = active_session(&mut state, "S-01");
        let err = state
            .insert_initiatives(session, vec![NewInitiative::new("A"), NewInitiative::new(" ")])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(state.initiatives_of(session).is_empty());
    }

    #[test]
    fn test_open_requires_active_session() {
        let mut state = ChamberState::default();
        let session = state
            .insert_session(NewSession::new("S-01", "Sitting"), Utc::now())
            .unwrap()
            .id;
        let item = state
            .insert_initiatives(session, vec![NewInitiative::new("A")])
            .unwrap()[0]
            .id;

        assert_eq!(
            state.open_initiative(item, &op(), Utc::now()).unwrap_err(),
            DomainError::SessionNotActive(session)
        );
    }

    #[test]
    fn test_open_demotes_other_open_initiative() {
        let mut state = state_with_roster(4);
        let session = active_session(&mut state, "S-01");
        let items = state
            .insert_initiatives(
                session,
                vec![NewInitiative::new("A"), NewInitiative::new("B")],
            )
            .unwrap();
        let (a, b) = (items[0].id, items[1].id);

        state.open_initiative(a, &op(), Utc::now()).unwrap();
        state.upsert_vote(vote(a, "leg-0", VoteValue::Favor)).unwrap();

        let opening = state.open_initiative(b, &op(), Utc::now()).unwrap();
        assert_eq!(opening.demoted.len(), 1);
        assert_eq!(opening.demoted[0].id, a);
        assert_eq!(opening.demoted[0].result, VoteOutcome::Approved);

        let open: Vec<_> = state
            .initiatives_of(session)
            .into_iter()
            .filter(|i| i.is_open())
            .collect();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, b);
    }

    #[test]
    fn test_upsert_overwrites_ballot() {
        let mut state = state_with_roster(3);
        let session = active_session(&mut state, "S-01");
        let item = state
            .insert_initiatives(session, vec![NewInitiative::new("A")])
            .unwrap()[0]
            .id;
        state.open_initiative(item, &op(), Utc::now()).unwrap();

        state.upsert_vote(vote(item, "leg-0", VoteValue::Against)).unwrap();
        let tally = state.upsert_vote(vote(item, "leg-0", VoteValue::Favor)).unwrap();

        assert_eq!(tally, Tally::new(1, 0, 0));
        let votes = state.votes_of(item).unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].value, VoteValue::Favor);
    }

    #[test]
    fn test_votes_newest_first() {
        let mut state = state_with_roster(3);
        let session = active_session(&mut state, "S-01");
        let item = state
            .insert_initiatives(session, vec![NewInitiative::new("A")])
            .unwrap()[0]
            .id;
        state.open_initiative(item, &op(), Utc::now()).unwrap();

        state.upsert_vote(vote(item, "leg-0", VoteValue::Favor)).unwrap();
        state.upsert_vote(vote(item, "leg-1", VoteValue::Against)).unwrap();
        state.upsert_vote(vote(item, "leg-2", VoteValue::Abstain)).unwrap();
        // Overwrite moves leg-0 to the front
        state.upsert_vote(vote(item, "leg-0", VoteValue::Against)).unwrap();

        let order: Vec<String> = state
            .votes_of(item)
            .unwrap()
            .into_iter()
            .map(|v| v.voter_id.to_string())
            .collect();
        assert_eq!(order, vec!["leg-0", "leg-2", "leg-1"]);
    }

    #[test]
    fn test_close_resolves_against_live_roster() {
        let mut state = state_with_roster(6);
        let session = active_session(&mut state, "S-01");
        let item = state
            .insert_initiatives(
                session,
                vec![NewInitiative::new("Reform").with_majority(MajorityType::Qualified)],
            )
            .unwrap()[0]
            .id;
        state.open_initiative(item, &op(), Utc::now()).unwrap();
        for (voter, value) in [
            ("leg-0", VoteValue::Favor),
            ("leg-1", VoteValue::Favor),
            ("leg-2", VoteValue::Favor),
            ("leg-3", VoteValue::Favor),
            ("leg-4", VoteValue::Against),
            ("leg-5", VoteValue::Abstain),
        ] {
            state.upsert_vote(vote(item, voter, value)).unwrap();
        }

        let closed = state.close_initiative(item, &op(), Utc::now()).unwrap();
        assert_eq!(closed.status, InitiativeStatus::Closed);
        assert_eq!(closed.result, VoteOutcome::Approved);
        assert_eq!(closed.eligible_at_close, Some(6));
        assert_eq!(state.tally(item).unwrap(), Tally::new(4, 1, 1));
    }

    #[test]
    fn test_close_session_counts_open_initiatives() {
        let mut state = ChamberState::default();
        let session = active_session(&mut state, "S-01");
        let item = state
            .insert_initiatives(session, vec![NewInitiative::new("A"), NewInitiative::new("B")])
            .unwrap()[0]
            .id;
        state.open_initiative(item, &op(), Utc::now()).unwrap();

        assert_eq!(
            state.close_session(session, &op(), Utc::now()).unwrap_err(),
            DomainError::OpenInitiativesRemain { session, count: 1 }
        );

        state.close_initiative(item, &op(), Utc::now()).unwrap();
        let closed = state.close_session(session, &op(), Utc::now()).unwrap();
        assert_eq!(closed.state, SessionState::Closed);
    }

    #[test]
    fn test_resume_suspends_the_session_active_meanwhile() {
        let mut state = ChamberState::default();
        let first = active_session(&mut state, "S-01");
        state.pause_session(first).unwrap();
        let second = active_session(&mut state, "S-02");

        let activation = state.resume_session(first).unwrap();
        assert_eq!(activation.session.id, first);
        assert_eq!(
            activation.suspended.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![second]
        );
        assert_eq!(state.session(second).unwrap().state, SessionState::Paused);

        let active: Vec<SessionId> = state
            .sessions()
            .into_iter()
            .filter(|s| s.is_active())
            .map(|s| s.id)
            .collect();
        assert_eq!(active, vec![first]);
    }

    #[test]
    fn test_ballot_from_unknown_member_is_rejected() {
        let mut state = state_with_roster(2);
        let session = active_session(&mut state, "S-01");
        let item = state
            .insert_initiatives(session, vec![NewInitiative::new("A")])
            .unwrap()[0]
            .id;
        state.open_initiative(item, &op(), Utc::now()).unwrap();

        assert_eq!(
            state
                .upsert_vote(vote(item, "stranger", VoteValue::Favor))
                .unwrap_err(),
            DomainError::MemberNotFound(MemberId::new("stranger"))
        );
        assert!(state.votes_of(item).unwrap().is_empty());
    }
}
