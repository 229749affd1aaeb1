//! Interface to the governance system on the remote chain.

use bridge_types::{Address, BlockNumber, ProposalId, Support, Tally};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GovernorError {
    #[error("remote governor rejected the vote: {0}")]
    Rejected(String),

    #[error("remote governor unavailable: {0}")]
    Unavailable(String),
}

/// Proposal metadata as the remote governor reports it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProposal {
    pub id: ProposalId,
    pub proposer: Address,
    pub start_block: BlockNumber,
    pub end_block: BlockNumber,
    pub tally: Tally,
    pub canceled: bool,
    pub executed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteReceipt {
    pub has_voted: bool,
    pub support: Support,
    pub votes: u128,
}

/// The remote governance system: metadata lookups plus the vote entry point.
pub trait RemoteGovernor {
    fn proposal(&self, id: ProposalId) -> Option<RemoteProposal>;

    fn receipt(&self, id: ProposalId, voter: &Address) -> Option<RemoteReceipt>;

    fn cast_vote(&self, id: ProposalId, support: Support, reason: &str) -> Result<(), GovernorError>;
}

impl<G: RemoteGovernor + ?Sized> RemoteGovernor for &G {
    fn proposal(&self, id: ProposalId) -> Option<RemoteProposal> {
        (**self).proposal(id)
    }

    fn receipt(&self, id: ProposalId, voter: &Address) -> Option<RemoteReceipt> {
        (**self).receipt(id, voter)
    }

    fn cast_vote(&self, id: ProposalId, support: Support, reason: &str) -> Result<(), GovernorError> {
        (**self).cast_vote(id, support, reason)
    }
}

impl<G: RemoteGovernor + ?Sized> RemoteGovernor for Arc<G> {
    fn proposal(&self, id: ProposalId) -> Option<RemoteProposal> {
        (**self).proposal(id)
    }

    fn receipt(&self, id: ProposalId, voter: &Address) -> Option<RemoteReceipt> {
        (**self).receipt(id, voter)
    }

    fn cast_vote(&self, id: ProposalId, support: Support, reason: &str) -> Result<(), GovernorError> {
        (**self).cast_vote(id, support, reason)
    }
}
