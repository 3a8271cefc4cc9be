//! Initiative lifecycle use case
//!
//! Builds agendas, opens one initiative at a time per session, and resolves
//! each initiative when it closes.

use super::shared::{Sinks, now};
use crate::error::ChamberError;
use crate::ports::audit_log::AuditLog;
use crate::ports::chamber_store::ChamberStore;
use crate::ports::notification_bus::NotificationBus;
use chamber_domain::{
    AuditKind, ChamberEvent, DomainError, Initiative, InitiativeId, MemberId, NewInitiative,
    Principal, SessionId,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

/// Use case owning the initiative state machine
pub struct InitiativeLifecycleUseCase<S: ChamberStore + ?Sized> {
    store: Arc<S>,
    sinks: Sinks,
}

impl<S: ChamberStore + ?Sized> InitiativeLifecycleUseCase<S> {
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

    /// Append a batch of items to a session's agenda.
    ///
    /// Ordinals continue after the session's highest existing ordinal, so the
    /// same call serves initial creation and later additions.
    pub async fn batch_create(
        &self,
        actor: &Principal,
        session_id: SessionId,
        items: Vec<NewInitiative>,
    ) -> Result<Vec<Initiative>, ChamberError> {
        actor.require_operator()?;
        if items.is_empty() {
            return Err(DomainError::validation("initiative batch cannot be empty").into());
        }
        for item in &items {
            item.validate()?;
        }

        let created = self.store.insert_initiatives(session_id, items).await?;
        info!(
            "{} initiative(s) added to session {}",
            created.len(),
            session_id
        );

        if let (Some(first), Some(last)) = (created.first(), created.last()) {
            self.sinks.audit(
                session_id,
                AuditKind::InitiativesCreated,
                format!(
                    "{} initiative(s) added as items {}-{}",
                    created.len(),
                    first.ordinal,
                    last.ordinal
                ),
                &actor.id,
                now(),
            );
        }
        Ok(created)
    }

    /// Open an initiative for voting.
    ///
    /// Any other open initiative of the session is closed and resolved first.
    pub async fn open(
        &self,
        actor: &Principal,
        id: InitiativeId,
    ) -> Result<Initiative, ChamberError> {
        actor.require_operator()?;

        let at = now();
        let opening = self.store.open_initiative(id, &actor.id, at).await?;

        for demoted in &opening.demoted {
            info!(
                "Initiative {} closed as {} to open {}",
                demoted.id, demoted.result, id
            );
            self.report_closure(demoted, &actor.id, at, " (superseded)");
        }

        let initiative = opening.initiative;
        info!("Initiative {} opened by {}", initiative.id, actor.id);
        self.sinks.audit(
            initiative.session_id,
            AuditKind::InitiativeOpened,
            format!("Item {} '{}' opened", initiative.ordinal, initiative.title),
            &actor.id,
            at,
        );
        self.sinks.publish(ChamberEvent::InitiativeOpened {
            initiative: initiative.clone(),
        });
        Ok(initiative)
    }

    /// Close an initiative: tally, resolve and persist in one write. Terminal.
    pub async fn close(
        &self,
        actor: &Principal,
        id: InitiativeId,
    ) -> Result<Initiative, ChamberError> {
        actor.require_operator()?;

        let at = now();
        let initiative = self.store.close_initiative(id, &actor.id, at).await?;
        info!(
            "Initiative {} closed by {}: {} ({}/{}/{})",
            initiative.id,
            actor.id,
            initiative.result,
            initiative.favor,
            initiative.against,
            initiative.abstain
        );

        self.report_closure(&initiative, &actor.id, at, "");
        Ok(initiative)
    }

    pub async fn get(&self, id: InitiativeId) -> Result<Initiative, ChamberError> {
        self.store
            .find_initiative(id)
            .await?
            .ok_or_else(|| DomainError::InitiativeNotFound(id).into())
    }

    /// A session's agenda in ordinal order
    pub async fn list_for_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<Initiative>, ChamberError> {
        if self.store.find_session(session_id).await?.is_none() {
            return Err(DomainError::SessionNotFound(session_id).into());
        }
        Ok(self.store.list_initiatives(session_id).await?)
    }

    fn report_closure(
        &self,
        initiative: &Initiative,
        actor: &MemberId,
        at: DateTime<Utc>,
        suffix: &str,
    ) {
        debug!(
            "Initiative {} resolved against {:?} eligible",
            initiative.id, initiative.eligible_at_close
        );
        self.sinks.audit(
            initiative.session_id,
            AuditKind::InitiativeClosed,
            format!(
                "Item {} '{}' closed{}: {} (favor {}, against {}, abstain {})",
                initiative.ordinal,
                initiative.title,
                suffix,
                initiative.result,
                initiative.favor,
                initiative.against,
                initiative.abstain
            ),
            actor,
            at,
        );
        self.sinks.publish(ChamberEvent::InitiativeClosed {
            initiative: initiative.clone(),
            tally: initiative.cached_tally(),
            result: initiative.result,
        });
    }
}
