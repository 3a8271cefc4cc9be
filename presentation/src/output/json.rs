//! JSON output formatter

use super::formatter::{OutputFormatter, TallyView};
use chamber_domain::{
    EventLogEntry, Initiative, Member, Session, SessionReport, Vote, VoteRecord,
};
use serde::Serialize;
use serde_json::json;

/// Formats chamber records as pretty-printed JSON
pub struct JsonFormatter;

impl JsonFormatter {
    fn render<T: Serialize + ?Sized>(value: &T) -> String {
        let mut output = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
        output.push('\n');
        output
    }
}

impl OutputFormatter for JsonFormatter {
    fn members(&self, members: &[Member]) -> String {
        Self::render(members)
    }

    fn session(&self, session: &Session) -> String {
        Self::render(session)
    }

    fn sessions(&self, sessions: &[Session]) -> String {
        Self::render(sessions)
    }

    fn initiatives(&self, initiatives: &[Initiative]) -> String {
        Self::render(initiatives)
    }

    fn initiative(&self, initiative: &Initiative) -> String {
        Self::render(initiative)
    }

    fn vote(&self, vote: &Vote) -> String {
        Self::render(vote)
    }

    fn removal(&self, initiative: &Initiative, voter: &str, removed: bool) -> String {
        Self::render(&json!({
            "initiative_id": initiative.id,
            "voter_id": voter,
            "removed": removed,
        }))
    }

    fn votes(&self, votes: &[VoteRecord]) -> String {
        Self::render(votes)
    }

    fn tally(&self, initiative: &Initiative, view: &TallyView) -> String {
        Self::render(&json!({
            "initiative_id": initiative.id,
            "status": initiative.status,
            "result": initiative.result,
            "tally": view.tally,
            "eligible_count": view.eligible_count,
            "participation_rate": view.participation_rate,
        }))
    }

    fn report(&self, report: &SessionReport) -> String {
        Self::render(report)
    }

    fn event_log(&self, _session: &Session, entries: &[EventLogEntry]) -> String {
        Self::render(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chamber_domain::{InitiativeId, NewInitiative, SessionId, Tally};

    #[test]
    fn test_tally_json_shape() {
        let initiative = Initiative::create(
            InitiativeId::new(9),
            SessionId::new(1),
            1,
            NewInitiative::new("Budget"),
        );
        let view = TallyView {
            tally: Tally::new(2, 1, 0),
            eligible_count: 4,
            participation_rate: 75,
        };

        let value: serde_json::Value =
            serde_json::from_str(&JsonFormatter.tally(&initiative, &view)).unwrap();
        assert_eq!(value["initiative_id"], 9);
        assert_eq!(value["status"], "pending");
        assert_eq!(value["result"], "pending");
        assert_eq!(value["tally"]["favor"], 2);
        assert_eq!(value["participation_rate"], 75);
    }

    #[test]
    fn test_empty_list_is_json_array() {
        assert_eq!(JsonFormatter.sessions(&[]).trim(), "[]");
    }
}
