//! End-to-end voting flow against the in-memory store.

use chamber_application::{
    ChamberError, ChamberStore, InitiativeLifecycleUseCase, NotificationBus, SessionLifecycleUseCase,
    SessionReportUseCase, VoteLedgerUseCase,
};
use chamber_domain::{
    AuditKind, DomainError, ErrorKind, Initiative, InitiativeStatus, MajorityType, Member,
    MemberId, NewInitiative, NewSession, Notification, Principal, Role, SessionId, SessionState,
    Tally, VoteOutcome, participation_rate,
};
use chamber_infrastructure::{InMemoryAuditLog, InMemoryChamberStore};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingBus {
    published: Mutex<Vec<Notification>>,
}

impl RecordingBus {
    fn names(&self) -> Vec<&'static str> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.name())
            .collect()
    }

    fn clear(&self) {
        self.published.lock().unwrap().clear();
    }
}

impl NotificationBus for RecordingBus {
    fn publish(&self, notification: Notification) {
        self.published.lock().unwrap().push(notification);
    }
}

struct Chamber {
    store: Arc<InMemoryChamberStore>,
    bus: Arc<RecordingBus>,
    sessions: SessionLifecycleUseCase<InMemoryChamberStore>,
    initiatives: InitiativeLifecycleUseCase<InMemoryChamberStore>,
    ledger: VoteLedgerUseCase<InMemoryChamberStore>,
    reports: SessionReportUseCase<InMemoryChamberStore>,
    operator: Principal,
    admin: Principal,
}

impl Chamber {
    async fn with_legislators(count: usize) -> Self {
        let store = Arc::new(InMemoryChamberStore::new());
        for n in 1..=count {
            store
                .upsert_member(Member::new(
                    format!("leg-{n}"),
                    format!("Legislator {n}"),
                    Role::Legislator,
                ))
                .await
                .unwrap();
        }
        store
            .upsert_member(Member::new("clerk", "Clerk", Role::Operator))
            .await
            .unwrap();
        store
            .upsert_member(Member::new("admin", "Secretary", Role::Administrator))
            .await
            .unwrap();

        let bus = Arc::new(RecordingBus::default());
        let audit = Arc::new(InMemoryAuditLog::new());
        Self {
            sessions: SessionLifecycleUseCase::new(store.clone())
                .with_audit_log(audit.clone())
                .with_notifier(bus.clone()),
            initiatives: InitiativeLifecycleUseCase::new(store.clone())
                .with_audit_log(audit.clone())
                .with_notifier(bus.clone()),
            ledger: VoteLedgerUseCase::new(store.clone())
                .with_audit_log(audit.clone())
                .with_notifier(bus.clone()),
            reports: SessionReportUseCase::new(store.clone()),
            store,
            bus,
            operator: Principal::operator("clerk"),
            admin: Principal::administrator("admin"),
        }
    }

    async fn active_session(&self, code: &str) -> SessionId {
        let session = self
            .sessions
            .create(&self.operator, NewSession::new(code, "Ordinary sitting"))
            .await
            .unwrap();
        self.sessions
            .activate(&self.operator, session.id)
            .await
            .unwrap();
        session.id
    }

    async fn agenda(&self, session: SessionId, items: Vec<NewInitiative>) -> Vec<Initiative> {
        self.initiatives
            .batch_create(&self.operator, session, items)
            .await
            .unwrap()
    }

    async fn cast(&self, initiative: &Initiative, voter: usize, value: &str) {
        self.ledger
            .cast(
                &Principal::legislator(format!("leg-{voter}")),
                initiative.id,
                value,
            )
            .await
            .unwrap();
    }
}

fn kind(err: &ChamberError) -> Option<ErrorKind> {
    err.kind()
}

#[tokio::test]
async fn test_at_most_one_active_session() {
    let chamber = Chamber::with_legislators(3).await;
    let first = chamber.active_session("S-01").await;
    let second = chamber.active_session("S-02").await;

    let sessions = chamber.sessions.list().await.unwrap();
    let active: Vec<_> = sessions.iter().filter(|s| s.is_active()).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, second);

    let suspended = chamber.sessions.get(first).await.unwrap();
    assert_eq!(suspended.state, SessionState::Paused);

    let kinds: Vec<AuditKind> = chamber
        .sessions
        .event_log(first)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            AuditKind::SessionCreated,
            AuditKind::SessionActivated,
            AuditKind::SessionPaused
        ]
    );
}

#[tokio::test]
async fn test_at_most_one_open_initiative_per_session() {
    let chamber = Chamber::with_legislators(3).await;
    let session = chamber.active_session("S-01").await;
    let items = chamber
        .agenda(
            session,
            vec![NewInitiative::new("Budget"), NewInitiative::new("Water")],
        )
        .await;

    chamber
        .initiatives
        .open(&chamber.operator, items[0].id)
        .await
        .unwrap();
    chamber.cast(&items[0], 1, "favor").await;
    chamber
        .initiatives
        .open(&chamber.operator, items[1].id)
        .await
        .unwrap();

    let agenda = chamber
        .initiatives
        .list_for_session(session)
        .await
        .unwrap();
    assert_eq!(agenda.iter().filter(|i| i.is_open()).count(), 1);
    assert_eq!(agenda[0].status, InitiativeStatus::Closed);
    assert_eq!(agenda[0].result, VoteOutcome::Approved);
    assert!(agenda[1].is_open());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_open_of_same_initiative() {
    let chamber = Arc::new(Chamber::with_legislators(3).await);
    let session = chamber.active_session("S-01").await;
    let item = chamber
        .agenda(session, vec![NewInitiative::new("Budget")])
        .await
        .remove(0);

    let attempts = (0..2).map(|_| {
        let chamber = chamber.clone();
        let id = item.id;
        tokio::spawn(async move { chamber.initiatives.open(&chamber.operator, id).await })
    });
    let results: Vec<_> = futures::future::join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let failure = results.into_iter().find_map(Result::err).unwrap();
    assert_eq!(
        failure.as_domain(),
        Some(&DomainError::InitiativeAlreadyOpen(item.id))
    );
}

#[tokio::test]
async fn test_recasting_same_vote_is_idempotent() {
    let chamber = Chamber::with_legislators(3).await;
    let session = chamber.active_session("S-01").await;
    let item = chamber
        .agenda(session, vec![NewInitiative::new("Budget")])
        .await
        .remove(0);
    chamber
        .initiatives
        .open(&chamber.operator, item.id)
        .await
        .unwrap();

    chamber.cast(&item, 1, "against").await;
    chamber.cast(&item, 1, "against").await;

    let votes = chamber.ledger.list_votes(item.id).await.unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].voter_name(), "Legislator 1");
    assert_eq!(
        chamber.ledger.tally(item.id).await.unwrap(),
        Tally::new(0, 1, 0)
    );
}

#[tokio::test]
async fn test_close_without_votes_is_no_votes() {
    let chamber = Chamber::with_legislators(3).await;
    let session = chamber.active_session("S-01").await;
    let item = chamber
        .agenda(session, vec![NewInitiative::new("Budget")])
        .await
        .remove(0);
    chamber
        .initiatives
        .open(&chamber.operator, item.id)
        .await
        .unwrap();

    let closed = chamber
        .initiatives
        .close(&chamber.operator, item.id)
        .await
        .unwrap();
    assert_eq!(closed.result, VoteOutcome::NoVotes);
    assert_eq!((closed.favor, closed.against, closed.abstain), (0, 0, 0));
}

#[tokio::test]
async fn test_qualified_majority_against_six_eligible() {
    let chamber = Chamber::with_legislators(6).await;
    let session = chamber.active_session("S-01").await;
    let items = chamber
        .agenda(
            session,
            vec![
                NewInitiative::new("Reform A").with_majority(MajorityType::Qualified),
                NewInitiative::new("Reform B").with_majority(MajorityType::Qualified),
            ],
        )
        .await;

    chamber
        .initiatives
        .open(&chamber.operator, items[0].id)
        .await
        .unwrap();
    for (voter, value) in [(1, "favor"), (2, "favor"), (3, "favor"), (4, "favor"), (5, "against"), (6, "abstain")] {
        chamber.cast(&items[0], voter, value).await;
    }
    let approved = chamber
        .initiatives
        .close(&chamber.operator, items[0].id)
        .await
        .unwrap();
    assert_eq!(approved.result, VoteOutcome::Approved);

    chamber
        .initiatives
        .open(&chamber.operator, items[1].id)
        .await
        .unwrap();
    for (voter, value) in [(1, "favor"), (2, "favor"), (3, "favor"), (5, "against"), (6, "abstain")] {
        chamber.cast(&items[1], voter, value).await;
    }
    let short = chamber
        .initiatives
        .close(&chamber.operator, items[1].id)
        .await
        .unwrap();
    assert_ne!(short.result, VoteOutcome::Approved);
}

#[tokio::test]
async fn test_simple_majority_and_tie() {
    let chamber = Chamber::with_legislators(5).await;
    let session = chamber.active_session("S-01").await;
    let items = chamber
        .agenda(
            session,
            vec![NewInitiative::new("Simple"), NewInitiative::new("Split")],
        )
        .await;

    chamber
        .initiatives
        .open(&chamber.operator, items[0].id)
        .await
        .unwrap();
    for (voter, value) in [(1, "favor"), (2, "favor"), (3, "favor"), (4, "against"), (5, "abstain")] {
        chamber.cast(&items[0], voter, value).await;
    }
    let simple = chamber
        .initiatives
        .close(&chamber.operator, items[0].id)
        .await
        .unwrap();
    assert_eq!(simple.result, VoteOutcome::Approved);

    chamber
        .initiatives
        .open(&chamber.operator, items[1].id)
        .await
        .unwrap();
    for (voter, value) in [(1, "favor"), (2, "favor"), (3, "against"), (4, "against"), (5, "abstain")] {
        chamber.cast(&items[1], voter, value).await;
    }
    let split = chamber
        .initiatives
        .close(&chamber.operator, items[1].id)
        .await
        .unwrap();
    assert_eq!(split.result, VoteOutcome::Tie);
}

#[tokio::test]
async fn test_session_close_requires_no_open_initiative() {
    let chamber = Chamber::with_legislators(3).await;
    let session = chamber.active_session("S-01").await;
    let items = chamber
        .agenda(
            session,
            vec![
                NewInitiative::new("Done"),
                NewInitiative::new("Voting"),
                NewInitiative::new("Never reached"),
            ],
        )
        .await;

    chamber
        .initiatives
        .open(&chamber.operator, items[0].id)
        .await
        .unwrap();
    chamber
        .initiatives
        .close(&chamber.operator, items[0].id)
        .await
        .unwrap();
    chamber
        .initiatives
        .open(&chamber.operator, items[1].id)
        .await
        .unwrap();

    let err = chamber
        .sessions
        .close(&chamber.operator, session)
        .await
        .unwrap_err();
    assert_eq!(
        err.as_domain(),
        Some(&DomainError::OpenInitiativesRemain { session, count: 1 })
    );
    assert!(err.to_string().contains('1'));

    chamber
        .initiatives
        .close(&chamber.operator, items[1].id)
        .await
        .unwrap();
    let closed = chamber
        .sessions
        .close(&chamber.operator, session)
        .await
        .unwrap();
    assert_eq!(closed.state, SessionState::Closed);

    let pending = chamber.initiatives.get(items[2].id).await.unwrap();
    assert_eq!(pending.status, InitiativeStatus::Pending);
}

#[tokio::test]
async fn test_vote_removal_rules() {
    let chamber = Chamber::with_legislators(3).await;
    let session = chamber.active_session("S-01").await;
    let item = chamber
        .agenda(session, vec![NewInitiative::new("Budget")])
        .await
        .remove(0);
    chamber
        .initiatives
        .open(&chamber.operator, item.id)
        .await
        .unwrap();
    chamber.cast(&item, 1, "favor").await;
    chamber.cast(&item, 2, "against").await;

    // Operators cannot correct the ledger
    let err = chamber
        .ledger
        .remove(&chamber.operator, item.id, &MemberId::new("leg-1"))
        .await
        .unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::Permission));

    let removed = chamber
        .ledger
        .remove(&chamber.admin, item.id, &MemberId::new("leg-1"))
        .await
        .unwrap();
    assert!(removed);
    assert_eq!(
        chamber.ledger.tally(item.id).await.unwrap(),
        Tally::new(0, 1, 0)
    );
    assert!(
        !chamber
            .ledger
            .remove(&chamber.admin, item.id, &MemberId::new("leg-3"))
            .await
            .unwrap()
    );

    chamber
        .initiatives
        .close(&chamber.operator, item.id)
        .await
        .unwrap();
    let err = chamber
        .ledger
        .remove(&chamber.admin, item.id, &MemberId::new("leg-2"))
        .await
        .unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::StateConflict));

    assert!(
        chamber
            .sessions
            .event_log(session)
            .await
            .unwrap()
            .iter()
            .any(|e| e.kind == AuditKind::VoteRemoved)
    );
}

#[tokio::test]
async fn test_votes_rejected_outside_open_window() {
    let chamber = Chamber::with_legislators(3).await;
    let session = chamber.active_session("S-01").await;
    let item = chamber
        .agenda(session, vec![NewInitiative::new("Budget")])
        .await
        .remove(0);

    let err = chamber
        .ledger
        .cast(&Principal::legislator("leg-1"), item.id, "favor")
        .await
        .unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::StateConflict));

    // The closed window is reported even when the value is also bad
    let err = chamber
        .ledger
        .cast(&Principal::legislator("leg-1"), item.id, "maybe")
        .await
        .unwrap_err();
    assert_eq!(
        err.as_domain(),
        Some(&DomainError::InitiativeNotOpen(item.id))
    );

    chamber
        .initiatives
        .open(&chamber.operator, item.id)
        .await
        .unwrap();

    let err = chamber
        .ledger
        .cast(&Principal::legislator("leg-1"), item.id, "maybe")
        .await
        .unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::Validation));

    let err = chamber
        .ledger
        .cast(&chamber.operator, item.id, "favor")
        .await
        .unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::NotEligible));

    let err = chamber
        .ledger
        .cast(&Principal::legislator("leg-1").inactive(), item.id, "favor")
        .await
        .unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::NotEligible));
}

#[tokio::test]
async fn test_participation_and_report() {
    let chamber = Chamber::with_legislators(6).await;
    let session = chamber.active_session("S-01").await;
    let items = chamber
        .agenda(
            session,
            vec![NewInitiative::new("Budget"), NewInitiative::new("Water")],
        )
        .await;
    chamber
        .initiatives
        .open(&chamber.operator, items[0].id)
        .await
        .unwrap();
    for voter in 1..=3 {
        chamber.cast(&items[0], voter, "favor").await;
    }

    assert_eq!(chamber.ledger.eligible_count().await.unwrap(), 6);
    assert_eq!(chamber.ledger.participation(items[0].id).await.unwrap(), 50);
    assert_eq!(participation_rate(&Tally::new(3, 0, 0), 6), 50);

    chamber
        .initiatives
        .close(&chamber.operator, items[0].id)
        .await
        .unwrap();
    let report = chamber.reports.report(session).await.unwrap();
    assert_eq!(report.eligible_count, 6);
    assert_eq!(report.initiatives.len(), 2);
    assert_eq!(report.initiatives[0].participation_rate, 50);
    assert_eq!(report.outcomes.approved, 1);
    assert_eq!(report.outcomes.pending, 1);
    assert!(report.open_initiative().is_none());
}

#[tokio::test]
async fn test_notifications_follow_transitions() {
    let chamber = Chamber::with_legislators(3).await;
    let session = chamber.active_session("S-01").await;
    let item = chamber
        .agenda(session, vec![NewInitiative::new("Budget")])
        .await
        .remove(0);
    assert_eq!(chamber.bus.names(), vec!["session-activated"]);
    chamber.bus.clear();

    chamber
        .initiatives
        .open(&chamber.operator, item.id)
        .await
        .unwrap();
    chamber.cast(&item, 1, "favor").await;
    chamber
        .ledger
        .remove(&chamber.admin, item.id, &MemberId::new("leg-1"))
        .await
        .unwrap();
    chamber
        .initiatives
        .close(&chamber.operator, item.id)
        .await
        .unwrap();
    chamber
        .sessions
        .close(&chamber.operator, session)
        .await
        .unwrap();

    assert_eq!(
        chamber.bus.names(),
        vec![
            "initiative-opened",
            "vote-update",
            "vote-update",
            "initiative-closed",
            "session-closed"
        ]
    );
}

#[tokio::test]
async fn test_rejected_transitions_emit_nothing() {
    let chamber = Chamber::with_legislators(3).await;
    let session = chamber
        .sessions
        .create(&chamber.operator, NewSession::new("S-01", "Sitting"))
        .await
        .unwrap();
    let item = chamber
        .agenda(session.id, vec![NewInitiative::new("Budget")])
        .await
        .remove(0);

    let err = chamber
        .initiatives
        .open(&chamber.operator, item.id)
        .await
        .unwrap_err();
    assert_eq!(
        err.as_domain(),
        Some(&DomainError::SessionNotActive(session.id))
    );

    let err = chamber
        .sessions
        .activate(&Principal::legislator("leg-1"), session.id)
        .await
        .unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::Permission));

    assert!(chamber.bus.names().is_empty());
    assert!(
        chamber
            .store
            .find_active_session()
            .await
            .unwrap()
            .is_none()
    );
}
