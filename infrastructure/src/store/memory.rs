//! In-process [`ChamberStore`] with optional JSON snapshot persistence.
//!
//! All state sits behind one mutex. A mutation runs against a clone of the
//! state, is written to the snapshot (when configured), and only then
//! replaces the live state. The check and the write therefore happen under
//! the same lock, and a failed snapshot write discards the draft.
//!
//! With a snapshot, every call first reloads the file under a cross-process
//! lock (shared for reads, exclusive for mutations). Several processes on the
//! same snapshot then validate against the latest committed state.

use super::snapshot::{self, SnapshotLock};
use super::state::ChamberState;
use async_trait::async_trait;
use chamber_application::{
    ChamberStore, InitiativeOpening, SessionActivation, StoreError, VoteRemoval,
};
use chamber_domain::{
    DomainError, Initiative, InitiativeId, Member, MemberId, NewInitiative, NewSession, Session,
    SessionId, Tally, Vote,
};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

pub struct InMemoryChamberStore {
    state: Mutex<ChamberState>,
    snapshot_path: Option<PathBuf>,
}

impl InMemoryChamberStore {
    /// Volatile store; state is lost on drop
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ChamberState::default()),
            snapshot_path: None,
        }
    }

    /// Store backed by a JSON snapshot at `path`.
    ///
    /// The file is created on the first write if it does not exist yet.
    pub fn open_snapshot(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let _file_lock = SnapshotLock::shared(&path).map_err(|e| {
            StoreError::Backend(format!("Failed to lock snapshot {}: {}", path.display(), e))
        })?;
        let state = snapshot::load(&path).map_err(|e| {
            StoreError::Backend(format!(
                "Failed to load snapshot {}: {}",
                path.display(),
                e
            ))
        })?;
        info!(
            "Loaded chamber snapshot {} ({} sessions)",
            path.display(),
            state.sessions().len()
        );
        Ok(Self {
            state: Mutex::new(state),
            snapshot_path: Some(path),
        })
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, ChamberState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Backend("Chamber state lock poisoned".to_string()))
    }

    fn read<T>(&self, f: impl FnOnce(&ChamberState) -> T) -> Result<T, StoreError> {
        let mut guard = self.lock()?;
        let _file_lock = self.refresh(&mut guard, SnapshotLock::shared)?;
        Ok(f(&guard))
    }

    /// Apply `f` to a draft and commit it only if `f` and persistence succeed
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut ChamberState) -> Result<T, DomainError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.lock()?;
        let _file_lock = self.refresh(&mut guard, SnapshotLock::exclusive)?;
        let mut draft = guard.clone();
        let value = f(&mut draft)?;

        if let Some(path) = &self.snapshot_path {
            snapshot::save(path, &draft).map_err(|e| {
                StoreError::Backend(format!(
                    "Failed to write snapshot {}: {}",
                    path.display(),
                    e
                ))
            })?;
            debug!("Snapshot written to {}", path.display());
        }

        *guard = draft;
        Ok(value)
    }

    /// Take the snapshot lock and replace `state` with what is on disk.
    ///
    /// The returned lock must outlive the read or the write it protects.
    fn refresh(
        &self,
        state: &mut ChamberState,
        acquire: fn(&Path) -> std::io::Result<SnapshotLock>,
    ) -> Result<Option<SnapshotLock>, StoreError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(None);
        };
        let lock = acquire(path).map_err(|e| {
            StoreError::Backend(format!("Failed to lock snapshot {}: {}", path.display(), e))
        })?;
        *state = snapshot::load(path).map_err(|e| {
            StoreError::Backend(format!(
                "Failed to reload snapshot {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Some(lock))
    }
}

impl Default for InMemoryChamberStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChamberStore for InMemoryChamberStore {
    async fn upsert_member(&self, member: Member) -> Result<(), StoreError> {
        self.mutate(|s| {
            s.upsert_member(member);
            Ok(())
        })
    }

    async fn find_member(&self, id: &MemberId) -> Result<Option<Member>, StoreError> {
        self.read(|s| s.member(id).cloned())
    }

    async fn list_members(&self) -> Result<Vec<Member>, StoreError> {
        self.read(|s| s.members())
    }

    async fn count_eligible_voters(&self) -> Result<u32, StoreError> {
        self.read(|s| s.eligible_count())
    }

    async fn insert_session(
        &self,
        new: NewSession,
        now: DateTime<Utc>,
    ) -> Result<Session, StoreError> {
        self.mutate(|s| s.insert_session(new, now))
    }

    async fn find_session(&self, id: SessionId) -> Result<Option<Session>, StoreError> {
        self.read(|s| s.session(id).ok().cloned())
    }

    async fn list_sessions(&self) -> Result<Vec<Session>, StoreError> {
        self.read(|s| s.sessions())
    }

    async fn find_active_session(&self) -> Result<Option<Session>, StoreError> {
        self.read(|s| s.active_session().cloned())
    }

    async fn activate_session(
        &self,
        id: SessionId,
        actor: &MemberId,
        now: DateTime<Utc>,
    ) -> Result<SessionActivation, StoreError> {
        self.mutate(|s| s.activate_session(id, actor, now))
    }

    async fn resume_session(&self, id: SessionId) -> Result<SessionActivation, StoreError> {
        self.mutate(|s| s.resume_session(id))
    }

    async fn pause_session(&self, id: SessionId) -> Result<Session, StoreError> {
        self.mutate(|s| s.pause_session(id))
    }

    async fn close_session(
        &self,
        id: SessionId,
        actor: &MemberId,
        now: DateTime<Utc>,
    ) -> Result<Session, StoreError> {
        self.mutate(|s| s.close_session(id, actor, now))
    }

    async fn insert_initiatives(
        &self,
        session_id: SessionId,
        items: Vec<NewInitiative>,
    ) -> Result<Vec<Initiative>, StoreError> {
        self.mutate(|s| s.insert_initiatives(session_id, items))
    }

    async fn find_initiative(&self, id: InitiativeId) -> Result<Option<Initiative>, StoreError> {
        self.read(|s| s.initiative(id).ok().cloned())
    }

    async fn list_initiatives(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<Initiative>, StoreError> {
        self.read(|s| s.initiatives_of(session_id))
    }

    async fn open_initiative(
        &self,
        id: InitiativeId,
        actor: &MemberId,
        now: DateTime<Utc>,
    ) -> Result<InitiativeOpening, StoreError> {
        self.mutate(|s| s.open_initiative(id, actor, now))
    }

    async fn close_initiative(
        &self,
        id: InitiativeId,
        actor: &MemberId,
        now: DateTime<Utc>,
    ) -> Result<Initiative, StoreError> {
        self.mutate(|s| s.close_initiative(id, actor, now))
    }

    async fn upsert_vote(&self, vote: Vote) -> Result<Tally, StoreError> {
        self.mutate(|s| s.upsert_vote(vote))
    }

    async fn delete_vote(
        &self,
        initiative_id: InitiativeId,
        voter_id: &MemberId,
    ) -> Result<VoteRemoval, StoreError> {
        self.mutate(|s| s.delete_vote(initiative_id, voter_id))
    }

    async fn list_votes(&self, initiative_id: InitiativeId) -> Result<Vec<Vote>, StoreError> {
        self.read(|s| s.votes_of(initiative_id))?
            .map_err(StoreError::from)
    }

    async fn tally(&self, initiative_id: InitiativeId) -> Result<Tally, StoreError> {
        self.read(|s| s.tally(initiative_id))?
            .map_err(StoreError::from)
    }
}
