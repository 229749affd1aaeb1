//! Proposal mirror table: mirrored proposals and their vote receipts.

use crate::error::GovernanceError;
use crate::proposal::{MirroredProposal, VoteReceipt};
use bridge_types::{Address, BlockNumber, Nonce, Outcome, ProposalId, Tally};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Keyed store of mirrored proposals and `(proposal, voter)` receipts.
///
/// The table enforces the structural invariants (mirror once, vote once,
/// tally equals the sum of receipts, sealed proposals never change); window
/// and authority checks belong to the state machine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalTable {
    proposals: BTreeMap<ProposalId, MirroredProposal>,
    receipts: BTreeMap<(ProposalId, Address), VoteReceipt>,
}

impl ProposalTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ProposalId) -> Option<&MirroredProposal> {
        self.proposals.get(&id)
    }

    pub fn contains(&self, id: ProposalId) -> bool {
        self.proposals.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    pub fn proposals(&self) -> impl Iterator<Item = &MirroredProposal> {
        self.proposals.values()
    }

    pub fn receipt(&self, id: ProposalId, voter: &Address) -> Option<&VoteReceipt> {
        self.receipts.get(&(id, *voter))
    }

    /// All receipts recorded for one proposal, ordered by voter.
    pub fn receipts_for(&self, id: ProposalId) -> impl Iterator<Item = &VoteReceipt> {
        self.receipts
            .range((id, Address::ZERO)..=(id, Address::new([0xff; 20])))
            .map(|(_, receipt)| receipt)
    }

    pub fn receipt_count(&self) -> usize {
        self.receipts.len()
    }

    /// Insert a freshly mirrored proposal. A proposal ID is mirrored at most once.
    pub fn insert(&mut self, proposal: MirroredProposal) -> Result<(), GovernanceError> {
        if self.proposals.contains_key(&proposal.id) {
            return Err(GovernanceError::AlreadyMirrored(proposal.id));
        }
        self.proposals.insert(proposal.id, proposal);
        Ok(())
    }

    /// Store a receipt and add its weight to the matching bucket.
    ///
    /// Either both the receipt and the tally change, or neither does.
    pub fn record_vote(&mut self, receipt: VoteReceipt) -> Result<Tally, GovernanceError> {
        let id = receipt.proposal_id;
        let key = (id, receipt.voter);
        if self.receipts.contains_key(&key) {
            return Err(GovernanceError::AlreadyVoted {
                proposal: id,
                voter: receipt.voter,
            });
        }
        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(GovernanceError::UnknownProposal(id))?;
        if proposal.finalized {
            return Err(GovernanceError::AlreadyFinalized(id));
        }
        let tally = proposal
            .tally
            .checked_add(receipt.support, receipt.weight)
            .ok_or(GovernanceError::TallyOverflow(id))?;
        proposal.tally = tally;
        self.receipts.insert(key, receipt);
        Ok(tally)
    }

    /// Seal a proposal with its permanent outcome.
    pub fn seal(
        &mut self,
        id: ProposalId,
        outcome: Outcome,
        finalized_at: BlockNumber,
        nonce: Nonce,
    ) -> Result<&MirroredProposal, GovernanceError> {
        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(GovernanceError::UnknownProposal(id))?;
        if proposal.finalized {
            return Err(GovernanceError::AlreadyFinalized(id));
        }
        proposal.finalized = true;
        proposal.outcome = outcome;
        proposal.finalized_at = Some(finalized_at);
        proposal.nonce = Some(nonce);
        Ok(proposal)
    }
}
