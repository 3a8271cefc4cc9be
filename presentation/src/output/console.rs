//! Console output formatter for chamber results

use super::formatter::{OutputFormatter, TallyView};
use chamber_domain::{
    EventLogEntry, Initiative, InitiativeStatus, Member, Session, SessionReport, SessionState,
    Tally, Vote, VoteOutcome, VoteRecord, VoteValue,
};
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};

/// Formats chamber records as human-readable text
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn timestamp(at: &DateTime<Utc>) -> String {
        at.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    fn session_state(state: SessionState) -> ColoredString {
        match state {
            SessionState::Active => state.as_str().green().bold(),
            SessionState::Paused => state.as_str().yellow(),
            SessionState::Closed => state.as_str().dimmed(),
            SessionState::Prepared | SessionState::Scheduled => state.as_str().normal(),
        }
    }

    fn status(initiative: &Initiative) -> ColoredString {
        match initiative.status {
            InitiativeStatus::Open => "open".green().bold(),
            InitiativeStatus::Pending => "pending".normal(),
            InitiativeStatus::Closed => Self::outcome(initiative.result),
        }
    }

    fn outcome(outcome: VoteOutcome) -> ColoredString {
        match outcome {
            VoteOutcome::Approved => outcome.as_str().green().bold(),
            VoteOutcome::Rejected => outcome.as_str().red().bold(),
            VoteOutcome::Tie => outcome.as_str().yellow().bold(),
            VoteOutcome::NoVotes | VoteOutcome::Pending => outcome.as_str().dimmed(),
        }
    }

    fn value(value: VoteValue) -> ColoredString {
        match value {
            VoteValue::Favor => value.as_str().green(),
            VoteValue::Against => value.as_str().red(),
            VoteValue::Abstain => value.as_str().yellow(),
        }
    }

    fn counts(tally: &Tally) -> String {
        format!(
            "{} favor / {} against / {} abstain",
            tally.favor, tally.against, tally.abstain
        )
    }

    fn initiative_line(initiative: &Initiative) -> String {
        format!(
            "{:>3}. [{}] {} ({}, {})",
            initiative.ordinal,
            initiative.id,
            initiative.title,
            initiative.majority_type,
            Self::status(initiative)
        )
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn members(&self, members: &[Member]) -> String {
        if members.is_empty() {
            return "No members on the roster\n".dimmed().to_string();
        }

        let mut output = Self::section_header("Roster");
        for member in members {
            let party = member.party.as_deref().unwrap_or("-");
            let line = format!(
                "  {:<12} {:<28} {:<14} {}",
                member.id.as_str(),
                member.name,
                member.role.as_str(),
                party
            );
            if member.active {
                output.push_str(&line);
            } else {
                output.push_str(&format!("{} {}", line.dimmed(), "(inactive)".dimmed()));
            }
            output.push('\n');
        }
        output
    }

    fn session(&self, session: &Session) -> String {
        format!(
            "Session {} [{}] {} - {}\n",
            session.code.bold(),
            session.id,
            session.name,
            Self::session_state(session.state)
        )
    }

    fn sessions(&self, sessions: &[Session]) -> String {
        if sessions.is_empty() {
            return "No sessions\n".dimmed().to_string();
        }

        let mut output = Self::section_header("Sessions");
        for session in sessions {
            output.push_str(&format!(
                "  [{}] {:<14} {:<30} {:<13} {}\n",
                session.id,
                session.code,
                session.name,
                session.kind.as_str(),
                Self::session_state(session.state)
            ));
        }
        output
    }

    fn initiatives(&self, initiatives: &[Initiative]) -> String {
        if initiatives.is_empty() {
            return "Agenda is empty\n".dimmed().to_string();
        }

        let mut output = Self::section_header("Agenda");
        for initiative in initiatives {
            output.push_str(&Self::initiative_line(initiative));
            output.push('\n');
        }
        output
    }

    fn initiative(&self, initiative: &Initiative) -> String {
        let mut output = Self::initiative_line(initiative);
        output.push('\n');
        if initiative.is_closed() {
            output.push_str(&format!(
                "     {} ({} eligible)\n",
                Self::counts(&initiative.cached_tally()),
                initiative.eligible_at_close.unwrap_or(0)
            ));
        }
        output
    }

    fn vote(&self, vote: &Vote) -> String {
        format!(
            "{} voted {} on initiative {}\n",
            vote.voter_id,
            Self::value(vote.value),
            vote.initiative_id
        )
    }

    fn removal(&self, initiative: &Initiative, voter: &str, removed: bool) -> String {
        if removed {
            format!("Ballot of {} on '{}' removed\n", voter, initiative.title)
        } else {
            format!("{} has no ballot on '{}'\n", voter, initiative.title)
                .dimmed()
                .to_string()
        }
    }

    fn votes(&self, votes: &[VoteRecord]) -> String {
        if votes.is_empty() {
            return "No ballots yet\n".dimmed().to_string();
        }

        let mut output = Self::section_header("Ballots (newest first)");
        for record in votes {
            output.push_str(&format!(
                "  {}  {:<28} {}\n",
                Self::timestamp(&record.vote.cast_at).dimmed(),
                record.voter_name(),
                Self::value(record.vote.value)
            ));
        }
        output
    }

    fn tally(&self, initiative: &Initiative, view: &TallyView) -> String {
        let mut output = format!("{}\n", Self::initiative_line(initiative));
        output.push_str(&format!("  {}\n", Self::counts(&view.tally)));
        output.push_str(&format!(
            "  {} of {} eligible voted ({}%)\n",
            view.tally.total, view.eligible_count, view.participation_rate
        ));
        output
    }

    fn report(&self, report: &SessionReport) -> String {
        let session = &report.session;
        let mut output = Self::header(&format!("Session {}", session.code));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Name:".cyan().bold(), session.name));
        output.push_str(&format!(
            "{} {} ({})\n",
            "State:".cyan().bold(),
            Self::session_state(session.state),
            session.kind
        ));
        if let Some(started) = &session.started_at {
            output.push_str(&format!(
                "{} {}\n",
                "Started:".cyan().bold(),
                Self::timestamp(started)
            ));
        }
        if let Some(closed) = &session.closed_at {
            output.push_str(&format!(
                "{} {}\n",
                "Closed:".cyan().bold(),
                Self::timestamp(closed)
            ));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Eligible voters:".cyan().bold(),
            report.eligible_count
        ));

        output.push_str(&Self::section_header("Agenda"));
        if report.initiatives.is_empty() {
            output.push_str(&"  (empty)\n".dimmed().to_string());
        }
        for summary in &report.initiatives {
            output.push_str(&Self::initiative_line(&summary.initiative));
            output.push('\n');
            output.push_str(&format!(
                "     {} - {}% participation\n",
                Self::counts(&summary.tally),
                summary.participation_rate
            ));
        }

        let outcomes = &report.outcomes;
        output.push_str(&Self::section_header("Outcomes"));
        output.push_str(&format!(
            "  approved {}  rejected {}  tie {}  no votes {}  pending {}\n",
            outcomes.approved, outcomes.rejected, outcomes.tie, outcomes.no_votes, outcomes.pending
        ));
        output.push_str(&format!("\n{}\n", "=".repeat(60).cyan()));
        output
    }

    fn event_log(&self, session: &Session, entries: &[EventLogEntry]) -> String {
        let mut output = Self::section_header(&format!("Event log: {}", session.code));
        if entries.is_empty() {
            output.push_str(&"  (no entries)\n".dimmed().to_string());
        }
        for entry in entries {
            output.push_str(&format!(
                "  {}  {:<20} {:<12} {}\n",
                Self::timestamp(&entry.timestamp).dimmed(),
                entry.kind.as_str(),
                entry.actor_id.as_str(),
                entry.description
            ));
        }
        output
    }
}
