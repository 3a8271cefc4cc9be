//! Majority rules for resolving an initiative
//!
//! This module defines which threshold a roll-call vote has to clear.

use crate::vote::Tally;
use serde::{Deserialize, Serialize};

/// Majority required to approve an initiative
///
/// - `Simple`: half of the votes cast, rounded up (default)
/// - `Absolute`: currently resolved like `Simple`
/// - `Qualified`: two thirds of every eligible legislator, not only those voting
/// - `Unanimous`: currently resolved like `Simple`
///
/// # Example
///
/// ```
/// use chamber_domain::resolution::MajorityType;
/// use chamber_domain::vote::Tally;
///
/// let tally = Tally::new(3, 1, 1);
/// assert_eq!(MajorityType::Simple.required_favor(&tally, 10), 3);    // ceil(5 / 2)
/// assert_eq!(MajorityType::Qualified.required_favor(&tally, 10), 7); // ceil(10 * 2 / 3)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MajorityType {
    #[default]
    Simple,
    Absolute,
    Qualified,
    Unanimous,
}

impl MajorityType {
    /// Minimum favor votes needed for approval.
    ///
    /// Qualified majority is measured against the full eligible roll; every
    /// other type is measured against the votes actually cast.
    pub fn required_favor(&self, tally: &Tally, eligible_count: u32) -> u32 {
        match self {
            MajorityType::Qualified => ceil_div(u64::from(eligible_count) * 2, 3),
            MajorityType::Simple | MajorityType::Absolute | MajorityType::Unanimous => {
                ceil_div(u64::from(tally.total), 2)
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MajorityType::Simple => "simple",
            MajorityType::Absolute => "absolute",
            MajorityType::Qualified => "qualified",
            MajorityType::Unanimous => "unanimous",
        }
    }

    /// Get a human-readable description of this rule
    pub fn description(&self) -> &str {
        match self {
            MajorityType::Simple => "simple majority (half of votes cast)",
            MajorityType::Absolute => "absolute majority",
            MajorityType::Qualified => "qualified majority (two thirds of eligible members)",
            MajorityType::Unanimous => "unanimity",
        }
    }
}

fn ceil_div(numerator: u64, denominator: u64) -> u32 {
    numerator.div_ceil(denominator) as u32
}

impl std::fmt::Display for MajorityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MajorityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(MajorityType::Simple),
            "absolute" => Ok(MajorityType::Absolute),
            "qualified" | "two_thirds" | "2/3" => Ok(MajorityType::Qualified),
            "unanimous" => Ok(MajorityType::Unanimous),
            other => Err(format!(
                "Unknown majority type: {}. Valid: simple, absolute, qualified, unanimous",
                other
            )),
        }
    }
}
