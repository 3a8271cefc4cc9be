//! Session report use case
//!
//! Read-only summary of a session's agenda, results and participation.

use crate::error::ChamberError;
use crate::ports::chamber_store::ChamberStore;
use chamber_domain::{DomainError, InitiativeSummary, SessionId, SessionReport};
use std::sync::Arc;

pub struct SessionReportUseCase<S: ChamberStore + ?Sized> {
    store: Arc<S>,
}

impl<S: ChamberStore + ?Sized> SessionReportUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn report(&self, session_id: SessionId) -> Result<SessionReport, ChamberError> {
        let session = self
            .store
            .find_session(session_id)
            .await?
            .ok_or(DomainError::SessionNotFound(session_id))?;
        let eligible_count = self.store.count_eligible_voters().await?;

        let mut summaries = Vec::new();
        for initiative in self.store.list_initiatives(session_id).await? {
            let tally = if initiative.is_closed() {
                initiative.cached_tally()
            } else {
                self.store.tally(initiative.id).await?
            };
            summaries.push(InitiativeSummary {
                participation_rate: tally.participation_rate(eligible_count),
                initiative,
                tally,
            });
        }

        Ok(SessionReport::new(session, eligible_count, summaries))
    }
}
