//! Ballot entities

use crate::core::error::DomainError;
use crate::core::ids::{InitiativeId, MemberId};
use crate::member::Member;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three admissible ballot values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
    Favor,
    Against,
    Abstain,
}

impl VoteValue {
    pub fn as_str(&self) -> &str {
        match self {
            VoteValue::Favor => "favor",
            VoteValue::Against => "against",
            VoteValue::Abstain => "abstain",
        }
    }
}

impl std::fmt::Display for VoteValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VoteValue {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "favor" => Ok(VoteValue::Favor),
            "against" => Ok(VoteValue::Against),
            "abstain" => Ok(VoteValue::Abstain),
            _ => Err(DomainError::InvalidVoteValue(s.to_string())),
        }
    }
}

/// One ballot, keyed by (initiative, voter).
///
/// Re-casting replaces both the value and the timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub initiative_id: InitiativeId,
    pub voter_id: MemberId,
    pub value: VoteValue,
    pub cast_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(
        initiative_id: InitiativeId,
        voter_id: impl Into<MemberId>,
        value: VoteValue,
        cast_at: DateTime<Utc>,
    ) -> Self {
        Self {
            initiative_id,
            voter_id: voter_id.into(),
            value,
            cast_at,
        }
    }
}

/// A vote with the voter's roster entry attached, for listings.
///
/// `voter` is `None` when the voter has since left the roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRecord {
    pub vote: Vote,
    pub voter: Option<Member>,
}

impl VoteRecord {
    /// Display name, falling back to the raw id
    pub fn voter_name(&self) -> &str {
        self.voter
            .as_ref()
            .map(|m| m.name.as_str())
            .unwrap_or_else(|| self.vote.voter_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::member::Role;

    #[test]
    fn test_parse_vote_value() {
        assert_eq!("favor".parse::<VoteValue>().unwrap(), VoteValue::Favor);
        assert_eq!(" Against ".parse::<VoteValue>().unwrap(), VoteValue::Against);
        assert_eq!("ABSTAIN".parse::<VoteValue>().unwrap(), VoteValue::Abstain);
    }

    #[test]
    fn test_reject_unknown_vote_value() {
        let err = "maybe".parse::<VoteValue>().unwrap_err();
        assert_eq!(err, DomainError::InvalidVoteValue("maybe".to_string()));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!("".parse::<VoteValue>().is_err());
    }

    #[test]
    fn test_voter_name_fallback() {
        let vote = Vote::new(InitiativeId::new(1), "leg-9", VoteValue::Favor, Utc::now());
        let anonymous = VoteRecord {
            vote: vote.clone(),
            voter: None,
        };
        assert_eq!(anonymous.voter_name(), "leg-9");

        let named = VoteRecord {
            vote,
            voter: Some(Member::new("leg-9", "Marta Díaz", Role::Legislator)),
        };
        assert_eq!(named.voter_name(), "Marta Díaz");
    }
}
