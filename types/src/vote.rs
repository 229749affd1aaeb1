//! Vote choices, weighted tallies and proposal outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A voter's choice on a mirrored proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Support {
    Against,
    For,
    Abstain,
}

impl Support {
    /// Numeric code used by governor-style vote entry points (0/1/2).
    pub fn code(&self) -> u8 {
        match self {
            Self::Against => 0,
            Self::For => 1,
            Self::Abstain => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Against),
            1 => Some(Self::For),
            2 => Some(Self::Abstain),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Against => "against",
            Self::For => "for",
            Self::Abstain => "abstain",
        }
    }
}

impl fmt::Display for Support {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a mirrored vote. `Pending` until finalized, then fixed forever.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Pending,
    Succeeded,
    Defeated,
    NotReachedQuorum,
}

impl Outcome {
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Defeated => "defeated",
            Self::NotReachedQuorum => "not_reached_quorum",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weighted vote totals for one proposal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub for_votes: u128,
    pub against_votes: u128,
    pub abstain_votes: u128,
}

impl Tally {
    pub const EMPTY: Self = Self {
        for_votes: 0,
        against_votes: 0,
        abstain_votes: 0,
    };

    pub fn new(for_votes: u128, against_votes: u128, abstain_votes: u128) -> Self {
        Self {
            for_votes,
            against_votes,
            abstain_votes,
        }
    }

    /// Sum of all three buckets. `None` on overflow.
    pub fn participation(&self) -> Option<u128> {
        self.for_votes
            .checked_add(self.against_votes)?
            .checked_add(self.abstain_votes)
    }

    /// Add `weight` to the bucket for `support`, returning the new tally.
    /// The tally is left untouched if the bucket would overflow.
    pub fn checked_add(&self, support: Support, weight: u128) -> Option<Self> {
        let mut next = *self;
        let bucket = match support {
            Support::For => &mut next.for_votes,
            Support::Against => &mut next.against_votes,
            Support::Abstain => &mut next.abstain_votes,
        };
        *bucket = bucket.checked_add(weight)?;
        // Participation must stay representable for the quorum check.
        next.participation()?;
        Some(next)
    }

    pub fn votes_for(&self, support: Support) -> u128 {
        match support {
            Support::For => self.for_votes,
            Support::Against => self.against_votes,
            Support::Abstain => self.abstain_votes,
        }
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "for={} against={} abstain={}",
            self.for_votes, self.against_votes, self.abstain_votes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn support_codes_round_trip() {
        for support in [Support::Against, Support::For, Support::Abstain] {
            assert_eq!(Support::from_code(support.code()), Some(support));
        }
        assert_eq!(Support::from_code(3), None);
    }

    #[test]
    fn checked_add_targets_the_right_bucket() {
        let tally = Tally::EMPTY
            .checked_add(Support::For, 50)
            .and_then(|t| t.checked_add(Support::Against, 30))
            .and_then(|t| t.checked_add(Support::Abstain, 10))
            .unwrap();
        assert_eq!(tally, Tally::new(50, 30, 10));
        assert_eq!(tally.participation(), Some(90));
        assert_eq!(tally.votes_for(Support::Against), 30);
    }

    #[test]
    fn checked_add_refuses_overflowing_participation() {
        let tally = Tally::new(u128::MAX - 1, 0, 0);
        assert!(tally.checked_add(Support::Against, 5).is_none());
        assert!(tally.checked_add(Support::For, 1).is_some());
    }

    #[test]
    fn only_pending_is_not_final() {
        assert!(!Outcome::Pending.is_final());
        assert!(Outcome::Succeeded.is_final());
        assert!(Outcome::Defeated.is_final());
        assert!(Outcome::NotReachedQuorum.is_final());
    }
}
