//! Live vote aggregation.
//!
//! A [`Tally`] is always rebuilt from the ledger; it is never adjusted
//! incrementally.

use super::entities::VoteValue;
use serde::{Deserialize, Serialize};

/// Aggregated ballot counts for one initiative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    pub favor: u32,
    pub against: u32,
    pub abstain: u32,
    pub total: u32,
}

impl Tally {
    pub fn new(favor: u32, against: u32, abstain: u32) -> Self {
        Self {
            favor,
            against,
            abstain,
            total: favor + against + abstain,
        }
    }

    /// Aggregate a set of ballot values
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = VoteValue>,
    {
        let mut tally = Tally::default();
        for value in values {
            match value {
                VoteValue::Favor => tally.favor += 1,
                VoteValue::Against => tally.against += 1,
                VoteValue::Abstain => tally.abstain += 1,
            }
            tally.total += 1;
        }
        tally
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Participation against the given eligible count, see [`participation_rate`]
    pub fn participation_rate(&self, eligible_count: u32) -> u32 {
        participation_rate(self, eligible_count)
    }
}

/// Percentage of eligible legislators that cast any vote, rounded half up.
///
/// Returns 0 when nobody is eligible.
pub fn participation_rate(tally: &Tally, eligible_count: u32) -> u32 {
    if eligible_count == 0 {
        return 0;
    }
    let total = u64::from(tally.total);
    let eligible = u64::from(eligible_count);
    ((total * 200 + eligible) / (eligible * 2)) as u32
}
