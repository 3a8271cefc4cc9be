//! Session lifecycle use case
//!
//! Drives sessions through `prepared | scheduled → active ⇄ paused → closed`
//! and keeps at most one session active.

use super::shared::{Sinks, now};
use crate::error::ChamberError;
use crate::ports::audit_log::AuditLog;
use crate::ports::chamber_store::{ChamberStore, SessionActivation};
use crate::ports::notification_bus::NotificationBus;
use chamber_domain::{
    AuditKind, ChamberEvent, DomainError, EventLogEntry, NewSession, Principal, Session, SessionId,
};
use std::sync::Arc;
use tracing::info;

/// Use case owning the session state machine
pub struct SessionLifecycleUseCase<S: ChamberStore + ?Sized> {
    store: Arc<S>,
    sinks: Sinks,
}

impl<S: ChamberStore + ?Sized> SessionLifecycleUseCase<S> {
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

    /// Register a session; it starts `scheduled` when a date is supplied
    pub async fn create(
        &self,
        actor: &Principal,
        new: NewSession,
    ) -> Result<Session, ChamberError> {
        actor.require_operator()?;
        new.validate()?;

        let at = now();
        let session = self.store.insert_session(new, at).await?;
        info!("Session {} ({}) created", session.id, session.code);

        self.sinks.audit(
            session.id,
            AuditKind::SessionCreated,
            format!("Session {} '{}' created as {}", session.code, session.name, session.state),
            &actor.id,
            at,
        );
        Ok(session)
    }

    /// Make a session the active one, suspending whichever was active
    pub async fn activate(
        &self,
        actor: &Principal,
        id: SessionId,
    ) -> Result<Session, ChamberError> {
        actor.require_operator()?;

        let at = now();
        let activation = self.store.activate_session(id, &actor.id, at).await?;
        info!("Session {} activated by {}", id, actor.id);

        self.report_activation(actor, &activation, AuditKind::SessionActivated, "activated");
        Ok(activation.session)
    }

    /// Interrupt the active session
    pub async fn pause(&self, actor: &Principal, id: SessionId) -> Result<Session, ChamberError> {
        actor.require_operator()?;

        let session = self.store.pause_session(id).await?;
        info!("Session {} paused by {}", id, actor.id);

        self.sinks.audit(
            session.id,
            AuditKind::SessionPaused,
            format!("Session {} paused", session.code),
            &actor.id,
            now(),
        );
        Ok(session)
    }

    /// Return a paused session to active
    pub async fn resume(&self, actor: &Principal, id: SessionId) -> Result<Session, ChamberError> {
        actor.require_operator()?;

        let activation = self.store.resume_session(id).await?;
        info!("Session {} resumed by {}", id, actor.id);

        self.report_activation(actor, &activation, AuditKind::SessionResumed, "resumed");
        Ok(activation.session)
    }

    /// Close for good; refused while an initiative is open
    pub async fn close(&self, actor: &Principal, id: SessionId) -> Result<Session, ChamberError> {
        actor.require_operator()?;

        let at = now();
        let session = self.store.close_session(id, &actor.id, at).await?;
        info!("Session {} closed by {}", id, actor.id);

        self.sinks.audit(
            session.id,
            AuditKind::SessionClosed,
            format!("Session {} closed", session.code),
            &actor.id,
            at,
        );
        self.sinks.publish(ChamberEvent::SessionClosed {
            session: session.clone(),
        });
        Ok(session)
    }

    pub async fn get(&self, id: SessionId) -> Result<Session, ChamberError> {
        self.store
            .find_session(id)
            .await?
            .ok_or_else(|| DomainError::SessionNotFound(id).into())
    }

    pub async fn list(&self) -> Result<Vec<Session>, ChamberError> {
        Ok(self.store.list_sessions().await?)
    }

    /// The session currently holding the active designation
    pub async fn active(&self) -> Result<Option<Session>, ChamberError> {
        Ok(self.store.find_active_session().await?)
    }

    /// Audit history of a session, oldest first
    pub async fn event_log(&self, id: SessionId) -> Result<Vec<EventLogEntry>, ChamberError> {
        let session = self.get(id).await?;
        Ok(self.sinks.audit.entries(session.id))
    }

    fn report_activation(
        &self,
        actor: &Principal,
        activation: &SessionActivation,
        kind: AuditKind,
        verb: &str,
    ) {
        let at = now();
        for suspended in &activation.suspended {
            info!(
                "Session {} suspended in favour of {}",
                suspended.id, activation.session.id
            );
            self.sinks.audit(
                suspended.id,
                AuditKind::SessionPaused,
                format!(
                    "Session {} suspended: session {} became active",
                    suspended.code, activation.session.code
                ),
                &actor.id,
                at,
            );
        }

        self.sinks.audit(
            activation.session.id,
            kind,
            format!("Session {} {}", activation.session.code, verb),
            &actor.id,
            at,
        );
        self.sinks.publish(ChamberEvent::SessionActivated {
            session: activation.session.clone(),
        });
    }
}
