//! Nullable remote governor: records votes, can be told to fail.

use bridge_executor::{GovernorError, RemoteGovernor, RemoteProposal, RemoteReceipt};
use bridge_types::{Address, ProposalId, Support};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedVote {
    pub proposal: ProposalId,
    pub support: Support,
    pub reason: String,
}

/// Behaves like a governor that lets one address vote once per proposal.
pub struct NullGovernor {
    voter: Address,
    proposals: Mutex<BTreeMap<ProposalId, RemoteProposal>>,
    votes: Mutex<Vec<RecordedVote>>,
    failures_remaining: Mutex<u32>,
}

impl NullGovernor {
    /// `voter` is the address the executor votes as.
    pub fn new(voter: Address) -> Self {
        Self {
            voter,
            proposals: Mutex::new(BTreeMap::new()),
            votes: Mutex::new(Vec::new()),
            failures_remaining: Mutex::new(0),
        }
    }

    pub fn add_proposal(&self, proposal: RemoteProposal) {
        self.proposals.lock().unwrap().insert(proposal.id, proposal);
    }

    /// Fail the next `count` vote calls.
    pub fn fail_next(&self, count: u32) {
        *self.failures_remaining.lock().unwrap() = count;
    }

    pub fn votes(&self) -> Vec<RecordedVote> {
        self.votes.lock().unwrap().clone()
    }

    pub fn vote_count(&self, proposal: ProposalId) -> usize {
        self.votes
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.proposal == proposal)
            .count()
    }
}

impl RemoteGovernor for NullGovernor {
    fn proposal(&self, id: ProposalId) -> Option<RemoteProposal> {
        self.proposals.lock().unwrap().get(&id).cloned()
    }

    fn receipt(&self, id: ProposalId, voter: &Address) -> Option<RemoteReceipt> {
        if *voter != self.voter {
            return None;
        }
        self.votes
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.proposal == id)
            .map(|v| RemoteReceipt {
                has_voted: true,
                support: v.support,
                votes: 1,
            })
    }

    fn cast_vote(&self, id: ProposalId, support: Support, reason: &str) -> Result<(), GovernorError> {
        {
            let mut remaining = self.failures_remaining.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(GovernorError::Unavailable("injected failure".into()));
            }
        }
        let mut votes = self.votes.lock().unwrap();
        if votes.iter().any(|v| v.proposal == id) {
            return Err(GovernorError::Rejected("voter already voted".into()));
        }
        votes.push(RecordedVote {
            proposal: id,
            support,
            reason: reason.to_string(),
        });
        Ok(())
    }
}
