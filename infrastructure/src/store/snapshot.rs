//! JSON snapshot of the whole chamber state.
//!
//! Written to a sibling temp file and renamed into place, so a crash mid-write
//! leaves the previous snapshot intact. Processes sharing a snapshot serialize
//! on an advisory lock held on a sibling `.lock` file.

use super::state::{ChamberState, LedgerEntry};
use chamber_domain::{Initiative, Member, Session};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Serialized form of [`ChamberState`]; maps become lists
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct ChamberSnapshot {
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub initiatives: Vec<Initiative>,
    #[serde(default)]
    pub ballots: Vec<LedgerEntry>,
    #[serde(default)]
    pub next_session_id: u64,
    #[serde(default)]
    pub next_initiative_id: u64,
    #[serde(default)]
    pub next_sequence: u64,
}

impl From<&ChamberState> for ChamberSnapshot {
    fn from(state: &ChamberState) -> Self {
        Self {
            members: state.members.values().cloned().collect(),
            sessions: state.sessions.values().cloned().collect(),
            initiatives: state.initiatives.values().cloned().collect(),
            ballots: state.ledger.values().cloned().collect(),
            next_session_id: state.next_session_id,
            next_initiative_id: state.next_initiative_id,
            next_sequence: state.next_sequence,
        }
    }
}

impl From<ChamberSnapshot> for ChamberState {
    fn from(snapshot: ChamberSnapshot) -> Self {
        let mut state = ChamberState {
            next_session_id: snapshot.next_session_id,
            next_initiative_id: snapshot.next_initiative_id,
            next_sequence: snapshot.next_sequence,
            ..Default::default()
        };
        for member in snapshot.members {
            state.members.insert(member.id.clone(), member);
        }
        for session in snapshot.sessions {
            state.next_session_id = state.next_session_id.max(session.id.value());
            state.sessions.insert(session.id, session);
        }
        for initiative in snapshot.initiatives {
            state.next_initiative_id = state.next_initiative_id.max(initiative.id.value());
            state.initiatives.insert(initiative.id, initiative);
        }
        for entry in snapshot.ballots {
            state.next_sequence = state.next_sequence.max(entry.sequence);
            let key = (entry.vote.initiative_id, entry.vote.voter_id.clone());
            state.ledger.insert(key, entry);
        }
        state
    }
}

/// Read a snapshot; a missing file yields an empty state
pub(crate) fn load(path: &Path) -> io::Result<ChamberState> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ChamberState::default()),
        Err(e) => return Err(e),
    };
    let snapshot: ChamberSnapshot = serde_json::from_str(&content)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(snapshot.into())
}

pub(crate) fn save(path: &Path, state: &ChamberState) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_vec_pretty(&ChamberSnapshot::from(state))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let tmp = temp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)
}

/// Advisory lock on `<snapshot>.lock`, released on drop
pub(crate) struct SnapshotLock {
    file: File,
}

impl SnapshotLock {
    /// Block until no other handle holds the lock exclusively
    pub(crate) fn shared(path: &Path) -> io::Result<Self> {
        let file = open_lock_file(path)?;
        FileExt::lock_shared(&file)?;
        Ok(Self { file })
    }

    /// Block until this handle is the only one holding the lock
    pub(crate) fn exclusive(path: &Path) -> io::Result<Self> {
        let file = open_lock_file(path)?;
        FileExt::lock_exclusive(&file)?;
        Ok(Self { file })
    }
}

impl Drop for SnapshotLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn open_lock_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(sibling(path, ".lock"))
}

fn temp_path(path: &Path) -> PathBuf {
    sibling(path, ".tmp")
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chamber_domain::{MemberId, NewInitiative, NewSession, Role, Vote, VoteValue};
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let state = load(&dir.path().join("absent.json")).unwrap();
        assert!(state.sessions().is_empty());
    }

    #[test]
    fn test_save_then_load_keeps_counters() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("chamber.json");
        let op = MemberId::new("op");

        let mut state = ChamberState::default();
        state.upsert_member(Member::new("leg-1", "Ana", Role::Legislator));
        let session = state
            .insert_session(NewSession::new("S-01", "Sitting"), Utc::now())
            .unwrap()
            .id;
        state.activate_session(session, &op, Utc::now()).unwrap();
        let item = state
            .insert_initiatives(session, vec![NewInitiative::new("A")])
            .unwrap()[0]
            .id;
        state.open_initiative(item, &op, Utc::now()).unwrap();
        state
            .upsert_vote(Vote::new(item, "leg-1", VoteValue::Favor, Utc::now()))
            .unwrap();

        save(&path, &state).unwrap();
        assert!(!temp_path(&path).exists());

        let mut restored = load(&path).unwrap();
        assert_eq!(restored.votes_of(item).unwrap().len(), 1);
        assert_eq!(restored.eligible_count(), 1);

        let next = restored
            .insert_session(NewSession::new("S-02", "Next"), Utc::now())
            .unwrap();
        assert!(next.id.value() > session.value());
    }

    #[test]
    fn test_corrupt_file_is_invalid_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chamber.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_exclusive_lock_excludes_other_handles() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("chamber.json");

        let held = SnapshotLock::exclusive(&path).unwrap();
        let other = open_lock_file(&path).unwrap();
        assert!(FileExt::try_lock_shared(&other).is_err());

        drop(held);
        assert!(FileExt::try_lock_exclusive(&other).is_ok());
    }
}
