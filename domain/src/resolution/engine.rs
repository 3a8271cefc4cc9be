//! Resolution of a closed roll call.

use super::outcome::VoteOutcome;
use super::rule::MajorityType;
use crate::vote::Tally;

/// Resolve a tally under the given majority type.
///
/// Pure integer arithmetic; the same inputs always give the same outcome.
///
/// 1. No votes cast → [`VoteOutcome::NoVotes`]
/// 2. favor ≥ [`MajorityType::required_favor`] → [`VoteOutcome::Approved`]
/// 3. against > favor → [`VoteOutcome::Rejected`]
/// 4. otherwise → [`VoteOutcome::Tie`]
///
/// # Example
///
/// ```
/// use chamber_domain::resolution::{MajorityType, VoteOutcome, compute_result};
/// use chamber_domain::vote::Tally;
///
/// let outcome = compute_result(MajorityType::Qualified, &Tally::new(4, 1, 1), 6);
/// assert_eq!(outcome, VoteOutcome::Approved);
/// ```
pub fn compute_result(majority: MajorityType, tally: &Tally, eligible_count: u32) -> VoteOutcome {
    if tally.total == 0 {
        return VoteOutcome::NoVotes;
    }

    if tally.favor >= majority.required_favor(tally, eligible_count) {
        VoteOutcome::Approved
    } else if tally.against > tally.favor {
        VoteOutcome::Rejected
    } else {
        VoteOutcome::Tie
    }
}
