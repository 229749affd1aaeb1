//! Quorum policy: turns a tally and a supply snapshot into an outcome.
//!
//! Participation counts every weighted vote (for, against and abstain). The
//! threshold is `floor(total_supply * quorum_bps / 10_000)`: truncation means
//! the threshold is never rounded up past what the supply can reach.

use bridge_authority::BPS_DENOMINATOR;
use bridge_types::{Outcome, Tally};

/// Minimum participation needed for `quorum_bps` of `total_supply`.
///
/// Computed as `q * bps + r * bps / 10_000` where `supply = q * 10_000 + r`,
/// which equals the truncated product for every `u128` supply without
/// overflowing.
pub fn quorum_threshold(total_supply: u128, quorum_bps: u16) -> u128 {
    let denominator = u128::from(BPS_DENOMINATOR);
    let bps = u128::from(quorum_bps);
    let quotient = total_supply / denominator;
    let remainder = total_supply % denominator;
    quotient
        .saturating_mul(bps)
        .saturating_add(remainder * bps / denominator)
}

/// Decide the outcome of a closed vote.
///
/// - participation below the threshold: `NotReachedQuorum`, whatever the split;
/// - otherwise `Succeeded` when `for > against`, else `Defeated` (ties lose).
pub fn evaluate(total_supply: u128, tally: &Tally, quorum_bps: u16) -> Outcome {
    // Participation can only exceed u128 if the tally itself overflowed, which
    // the mirror table refuses; treat it as saturated.
    let participation = tally.participation().unwrap_or(u128::MAX);
    if participation < quorum_threshold(total_supply, quorum_bps) {
        return Outcome::NotReachedQuorum;
    }
    if tally.for_votes > tally.against_votes {
        Outcome::Succeeded
    } else {
        Outcome::Defeated
    }
}
