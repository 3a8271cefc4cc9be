//! Roster entities and the acting principal

use crate::core::error::DomainError;
use crate::core::ids::MemberId;
use serde::{Deserialize, Serialize};

/// Role a chamber member holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Voting member
    #[default]
    Legislator,
    /// Runs the sitting: activates sessions, opens and closes initiatives
    Operator,
    /// Operator privileges plus ledger corrections
    Administrator,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Legislator => "legislator",
            Role::Operator => "operator",
            Role::Administrator => "administrator",
        }
    }

    /// Whether this role may drive session and initiative lifecycles
    pub fn can_operate(&self) -> bool {
        matches!(self, Role::Operator | Role::Administrator)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "legislator" => Ok(Role::Legislator),
            "operator" => Ok(Role::Operator),
            "administrator" | "admin" => Ok(Role::Administrator),
            other => Err(format!(
                "Unknown role: {}. Valid: legislator, operator, administrator",
                other
            )),
        }
    }
}

/// A roster entry
///
/// The roster backs voter identity in vote listings and the live
/// eligible-voter count used at tally time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub role: Role,
    pub party: Option<String>,
    pub active: bool,
}

impl Member {
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            party: None,
            active: true,
        }
    }

    pub fn with_party(mut self, party: impl Into<String>) -> Self {
        self.party = Some(party.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Counted in the eligible-voter set
    pub fn is_eligible_voter(&self) -> bool {
        self.active && self.role == Role::Legislator
    }

    /// The principal this member acts as
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id.clone(),
            role: self.role,
            active: self.active,
        }
    }
}

/// The acting principal for a mutating call.
///
/// Authentication happens upstream; only the role and active flag are
/// re-checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: MemberId,
    pub role: Role,
    pub active: bool,
}

impl Principal {
    pub fn new(id: impl Into<MemberId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            active: true,
        }
    }

    pub fn legislator(id: impl Into<MemberId>) -> Self {
        Self::new(id, Role::Legislator)
    }

    pub fn operator(id: impl Into<MemberId>) -> Self {
        Self::new(id, Role::Operator)
    }

    pub fn administrator(id: impl Into<MemberId>) -> Self {
        Self::new(id, Role::Administrator)
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Require an active operator or administrator
    pub fn require_operator(&self) -> Result<(), DomainError> {
        if self.active && self.role.can_operate() {
            Ok(())
        } else {
            Err(DomainError::PermissionDenied {
                actor: self.id.clone(),
                required: Role::Operator,
            })
        }
    }

    /// Require an active administrator
    pub fn require_administrator(&self) -> Result<(), DomainError> {
        if self.active && self.role == Role::Administrator {
            Ok(())
        } else {
            Err(DomainError::PermissionDenied {
                actor: self.id.clone(),
                required: Role::Administrator,
            })
        }
    }

    /// Require an active legislator (ballot eligibility)
    pub fn require_eligible_voter(&self) -> Result<(), DomainError> {
        if self.active && self.role == Role::Legislator {
            Ok(())
        } else {
            Err(DomainError::NotEligible(self.id.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    #[test]
    fn test_operator_guard() {
        assert!(Principal::operator("op").require_operator().is_ok());
        assert!(Principal::administrator("adm").require_operator().is_ok());

        let err = Principal::legislator("leg").require_operator().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Permission);

        let err = Principal::operator("op")
            .inactive()
            .require_operator()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Permission);
    }

    #[test]
    fn test_administrator_guard() {
        assert!(Principal::administrator("adm").require_administrator().is_ok());
        assert!(Principal::operator("op").require_administrator().is_err());
    }

    #[test]
    fn test_voter_eligibility() {
        assert!(Principal::legislator("leg").require_eligible_voter().is_ok());

        let err = Principal::operator("op").require_eligible_voter().unwrap_err();
        assert_eq!(err, DomainError::NotEligible(MemberId::new("op")));

        let err = Principal::legislator("leg")
            .inactive()
            .require_eligible_voter()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotEligible);
    }

    #[test]
    fn test_member_eligibility_and_principal() {
        let member = Member::new("leg-1", "Ana Ruiz", Role::Legislator).with_party("Verde");
        assert!(member.is_eligible_voter());
        assert_eq!(member.principal(), Principal::legislator("leg-1"));

        assert!(!member.clone().inactive().is_eligible_voter());
        assert!(!Member::new("op-1", "Clerk", Role::Operator).is_eligible_voter());
    }

    #[test]
    fn test_parse_role() {
        assert_eq!("Legislator".parse::<Role>().ok(), Some(Role::Legislator));
        assert_eq!("admin".parse::<Role>().ok(), Some(Role::Administrator));
        assert!("speaker".parse::<Role>().is_err());
    }
}
