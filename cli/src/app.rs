//! Command dispatch: one use-case call per subcommand

use anyhow::{Context, Result, bail};
use chamber_application::{
    AuditLog, ChamberStore, InitiativeLifecycleUseCase, NotificationBus, SessionLifecycleUseCase,
    SessionReportUseCase, VoteLedgerUseCase,
};
use chamber_domain::{DomainError, MemberId, NewInitiative, NewSession, Principal};
use chamber_infrastructure::InMemoryChamberStore;
use chamber_presentation::{
    AddInitiativeArgs, Command, CreateSessionArgs, InitiativeCommand, OutputFormatter,
    SessionCommand, TallyView, VoteCommand,
};
use std::sync::Arc;
use tracing::debug;

pub struct App {
    store: Arc<InMemoryChamberStore>,
    sessions: SessionLifecycleUseCase<InMemoryChamberStore>,
    initiatives: InitiativeLifecycleUseCase<InMemoryChamberStore>,
    ledger: VoteLedgerUseCase<InMemoryChamberStore>,
    reports: SessionReportUseCase<InMemoryChamberStore>,
    formatter: Box<dyn OutputFormatter>,
    acting_as: Option<String>,
}

impl App {
    pub fn new(
        store: Arc<InMemoryChamberStore>,
        audit: Arc<dyn AuditLog>,
        notifier: Arc<dyn NotificationBus>,
        formatter: Box<dyn OutputFormatter>,
        acting_as: Option<String>,
    ) -> Self {
        Self {
            sessions: SessionLifecycleUseCase::new(store.clone())
                .with_audit_log(audit.clone())
                .with_notifier(notifier.clone()),
            initiatives: InitiativeLifecycleUseCase::new(store.clone())
                .with_audit_log(audit.clone())
                .with_notifier(notifier.clone()),
            ledger: VoteLedgerUseCase::new(store.clone())
                .with_audit_log(audit)
                .with_notifier(notifier),
            reports: SessionReportUseCase::new(store.clone()),
            store,
            formatter,
            acting_as,
        }
    }

    /// Execute a command and return its rendered output
    pub async fn run(&self, command: Command) -> Result<String> {
        match command {
            Command::Members => {
                let members = self.store.list_members().await?;
                Ok(self.formatter.members(&members))
            }
            Command::Session(cmd) => self.run_session(cmd).await,
            Command::Initiative(cmd) => self.run_initiative(cmd).await,
            Command::Vote(cmd) => self.run_vote(cmd).await,
        }
    }

    async fn run_session(&self, command: SessionCommand) -> Result<String> {
        let f = &self.formatter;
        let output = match command {
            SessionCommand::Create(args) => {
                let session = self
                    .sessions
                    .create(&self.principal().await?, new_session(args))
                    .await?;
                f.session(&session)
            }
            SessionCommand::List => f.sessions(&self.sessions.list().await?),
            SessionCommand::Activate { id } => {
                f.session(&self.sessions.activate(&self.principal().await?, id).await?)
            }
            SessionCommand::Pause { id } => {
                f.session(&self.sessions.pause(&self.principal().await?, id).await?)
            }
            SessionCommand::Resume { id } => {
                f.session(&self.sessions.resume(&self.principal().await?, id).await?)
            }
            SessionCommand::Close { id } => {
                f.session(&self.sessions.close(&self.principal().await?, id).await?)
            }
            SessionCommand::Report { id } => f.report(&self.reports.report(id).await?),
            SessionCommand::Log { id } => {
                let session = self.sessions.get(id).await?;
                let entries = self.sessions.event_log(id).await?;
                f.event_log(&session, &entries)
            }
        };
        Ok(output)
    }

    async fn run_initiative(&self, command: InitiativeCommand) -> Result<String> {
        let f = &self.formatter;
        let output = match command {
            InitiativeCommand::Add(args) => {
                let session = args.session;
                let items = new_initiatives(args)?;
                let created = self
                    .initiatives
                    .batch_create(&self.principal().await?, session, items)
                    .await?;
                f.initiatives(&created)
            }
            InitiativeCommand::List { session } => {
                f.initiatives(&self.initiatives.list_for_session(session).await?)
            }
            InitiativeCommand::Open { id } => {
                f.initiative(&self.initiatives.open(&self.principal().await?, id).await?)
            }
            InitiativeCommand::Close { id } => {
                f.initiative(&self.initiatives.close(&self.principal().await?, id).await?)
            }
        };
        Ok(output)
    }

    async fn run_vote(&self, command: VoteCommand) -> Result<String> {
        let f = &self.formatter;
        let output = match command {
            VoteCommand::Cast { initiative, value } => {
                let vote = self
                    .ledger
                    .cast(&self.principal().await?, initiative, &value)
                    .await?;
                f.vote(&vote)
            }
            VoteCommand::Remove { initiative, voter } => {
                let voter_id = MemberId::new(voter.trim());
                let removed = self
                    .ledger
                    .remove(&self.principal().await?, initiative, &voter_id)
                    .await?;
                let initiative = self.initiatives.get(initiative).await?;
                f.removal(&initiative, voter_id.as_str(), removed)
            }
            VoteCommand::List { initiative } => {
                f.votes(&self.ledger.list_votes(initiative).await?)
            }
            VoteCommand::Tally { initiative } => {
                let record = self.initiatives.get(initiative).await?;
                let tally = self.ledger.tally(initiative).await?;
                let eligible_count = self.ledger.eligible_count().await?;
                let view = TallyView {
                    tally,
                    eligible_count,
                    participation_rate: tally.participation_rate(eligible_count),
                };
                f.tally(&record, &view)
            }
        };
        Ok(output)
    }

    /// Resolve `--as` against the roster
    async fn principal(&self) -> Result<Principal> {
        let Some(id) = self.acting_as.as_deref() else {
            bail!("This command changes chamber state; pass --as <member-id>");
        };
        let id = MemberId::new(id.trim());
        let member = self
            .store
            .find_member(&id)
            .await?
            .ok_or_else(|| DomainError::MemberNotFound(id.clone()))?;
        debug!("Acting as {} ({})", member.id, member.role);
        Ok(member.principal())
    }
}

fn new_session(args: CreateSessionArgs) -> NewSession {
    let mut new = NewSession::new(args.code, args.name).with_kind(args.kind);
    if let Some(description) = args.description {
        new = new.with_description(description);
    }
    if let Some(at) = args.scheduled_at {
        new = new.scheduled_for(at);
    }
    new
}

fn new_initiatives(args: AddInitiativeArgs) -> Result<Vec<NewInitiative>> {
    let mut items: Vec<NewInitiative> = args
        .titles
        .into_iter()
        .map(|title| NewInitiative {
            title,
            description: args.description.clone(),
            presenter: args.presenter.clone(),
            party: args.party.clone(),
            majority_type: args.majority,
        })
        .collect();

    if let Some(path) = &args.file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let batch: Vec<NewInitiative> = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a JSON array of initiatives", path.display()))?;
        items.extend(batch);
    }
    Ok(items)
}
