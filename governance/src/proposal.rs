//! Mirrored proposals, vote receipts and their lifecycle.

use bridge_types::{Address, BlockNumber, Nonce, Outcome, ProposalId, Support, Tally};
use serde::{Deserialize, Serialize};

/// Lifecycle of a proposal as seen from the home chain at a given block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalState {
    /// Never mirrored on this instance.
    Unmirrored,
    /// Mirrored, voting window not yet open.
    Upcoming,
    /// Inside the voting window.
    Active,
    /// Window closed, waiting for anyone to finalize.
    AwaitingFinalization,
    /// Sealed with a permanent outcome.
    Finalized(Outcome),
}

/// A remote proposal mirrored onto the home chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirroredProposal {
    pub id: ProposalId,
    /// First block in which votes are accepted.
    pub start_block: BlockNumber,
    /// Last block in which votes are accepted (inclusive).
    pub end_block: BlockNumber,
    /// Block at which voting power is read for every voter.
    pub snapshot_block: BlockNumber,
    pub tally: Tally,
    pub finalized: bool,
    pub outcome: Outcome,
    pub mirrored_at: BlockNumber,
    pub finalized_at: Option<BlockNumber>,
    /// Nonce of the instruction emitted at finalization.
    pub nonce: Option<Nonce>,
}

impl MirroredProposal {
    pub fn new(
        id: ProposalId,
        start_block: BlockNumber,
        end_block: BlockNumber,
        mirrored_at: BlockNumber,
    ) -> Self {
        Self {
            id,
            start_block,
            end_block,
            snapshot_block: start_block,
            tally: Tally::EMPTY,
            finalized: false,
            outcome: Outcome::Pending,
            mirrored_at,
            finalized_at: None,
            nonce: None,
        }
    }

    /// Whether `block` lies inside the inclusive voting window.
    pub fn is_open_at(&self, block: BlockNumber) -> bool {
        block >= self.start_block && block <= self.end_block
    }

    pub fn state_at(&self, block: BlockNumber) -> ProposalState {
        if self.finalized {
            ProposalState::Finalized(self.outcome)
        } else if block < self.start_block {
            ProposalState::Upcoming
        } else if block <= self.end_block {
            ProposalState::Active
        } else {
            ProposalState::AwaitingFinalization
        }
    }
}

/// One voter's accepted vote on one proposal. Immutable once written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub proposal_id: ProposalId,
    pub voter: Address,
    pub support: Support,
    /// Voting power at the proposal's snapshot block.
    pub weight: u128,
    pub cast_block: BlockNumber,
}
