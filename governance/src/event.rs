//! Change notifications emitted by the home relay.

use bridge_authority::AdminEvent;
use bridge_messages::InstructionDigest;
use bridge_types::{Address, BlockNumber, Nonce, Outcome, ProposalId, Support, Tally};

/// Exactly one event per successful state transition; none on failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HomeEvent {
    ProposalMirrored {
        proposal: ProposalId,
        start_block: BlockNumber,
        end_block: BlockNumber,
    },
    VoteCast {
        proposal: ProposalId,
        voter: Address,
        support: Support,
        weight: u128,
        reason: String,
    },
    ProposalFinalized {
        proposal: ProposalId,
        outcome: Outcome,
        tally: Tally,
        nonce: Nonce,
        digest: InstructionDigest,
    },
    Admin(AdminEvent),
}

impl HomeEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProposalMirrored { .. } => "proposal_mirrored",
            Self::VoteCast { .. } => "vote_cast",
            Self::ProposalFinalized { .. } => "proposal_finalized",
            Self::Admin(admin) => admin.name(),
        }
    }
}
