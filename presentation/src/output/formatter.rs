//! Output formatter trait

use chamber_domain::{
    EventLogEntry, Initiative, Member, Session, SessionReport, Tally, Vote, VoteRecord,
};

/// Participation figures shown next to a tally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TallyView {
    pub tally: Tally,
    pub eligible_count: u32,
    pub participation_rate: u32,
}

/// Renders command results; one implementation per output format
pub trait OutputFormatter {
    fn members(&self, members: &[Member]) -> String;

    fn session(&self, session: &Session) -> String;

    fn sessions(&self, sessions: &[Session]) -> String;

    fn initiatives(&self, initiatives: &[Initiative]) -> String;

    /// A single initiative after a transition (open, close)
    fn initiative(&self, initiative: &Initiative) -> String;

    fn vote(&self, vote: &Vote) -> String;

    fn removal(&self, initiative: &Initiative, voter: &str, removed: bool) -> String;

    fn votes(&self, votes: &[VoteRecord]) -> String;

    fn tally(&self, initiative: &Initiative, view: &TallyView) -> String;

    fn report(&self, report: &SessionReport) -> String;

    fn event_log(&self, session: &Session, entries: &[EventLogEntry]) -> String;
}
