//! Execution ledger: the remote side's idempotency record.
//!
//! Keyed by proposal ID. An entry in `executions` is written exactly once and
//! never removed; it is what makes redelivered instructions harmless.
//!
//! Nonces are only unique per home instance, so consumed nonces are keyed by
//! the attested [`Origin`] as well.

use bridge_messages::{InboundMessage, InstructionDigest, RelayInstruction};
use bridge_types::{Address, BlockNumber, ChainId, Nonce, Outcome, ProposalId, Tally};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which path carried an instruction to execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Executor {
    Relayed,
    Manual(Address),
}

impl fmt::Display for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relayed => f.write_str("relayed"),
            Self::Manual(by) => write!(f, "manual({by})"),
        }
    }
}

/// Chain and sender the transport attested for an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Origin {
    pub chain: ChainId,
    pub sender: Address,
}

impl Origin {
    pub fn new(chain: ChainId, sender: Address) -> Self {
        Self { chain, sender }
    }
}

impl From<&InboundMessage> for Origin {
    fn from(message: &InboundMessage) -> Self {
        Self::new(message.source_chain, message.sender)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.sender, self.chain)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub proposal_id: ProposalId,
    pub executed: bool,
    pub executed_at: BlockNumber,
    pub executor: Executor,
    pub origin: Origin,
    pub nonce: Nonce,
    pub digest: InstructionDigest,
}

/// An authenticated, executable instruction whose remote call failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingInstruction {
    pub origin: Origin,
    pub instruction: RelayInstruction,
    pub first_seen: BlockNumber,
    pub last_error: String,
    pub attempts: u32,
}

/// An authenticated instruction that carried a non-executable outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedOutcome {
    pub proposal_id: ProposalId,
    pub outcome: Outcome,
    pub tally: Tally,
    pub nonce: Nonce,
    pub observed_at: BlockNumber,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionLedger {
    executions: BTreeMap<ProposalId, ExecutionRecord>,
    pending: BTreeMap<ProposalId, PendingInstruction>,
    observed: BTreeMap<ProposalId, ObservedOutcome>,
    consumed_nonces: BTreeMap<(Origin, Nonce), ProposalId>,
}

impl ExecutionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_executed(&self, id: ProposalId) -> bool {
        self.executions.get(&id).is_some_and(|r| r.executed)
    }

    pub fn execution(&self, id: ProposalId) -> Option<&ExecutionRecord> {
        self.executions.get(&id)
    }

    pub fn executions(&self) -> impl Iterator<Item = &ExecutionRecord> {
        self.executions.values()
    }

    pub fn pending(&self, id: ProposalId) -> Option<&PendingInstruction> {
        self.pending.get(&id)
    }

    pub fn pending_instructions(&self) -> impl Iterator<Item = &PendingInstruction> {
        self.pending.values()
    }

    pub fn observed(&self, id: ProposalId) -> Option<&ObservedOutcome> {
        self.observed.get(&id)
    }

    /// Proposal whose execution consumed `nonce` from `origin`, if any.
    pub fn nonce_owner(&self, origin: Origin, nonce: Nonce) -> Option<ProposalId> {
        self.consumed_nonces.get(&(origin, nonce)).copied()
    }

    pub fn execution_count(&self) -> usize {
        self.executions.len()
    }

    /// Record a successful execution. First writer wins: returns `false`
    /// without touching anything if the proposal is already executed.
    pub fn mark_executed(&mut self, record: ExecutionRecord) -> bool {
        if self.is_executed(record.proposal_id) {
            return false;
        }
        self.pending.remove(&record.proposal_id);
        self.consumed_nonces
            .insert((record.origin, record.nonce), record.proposal_id);
        self.executions.insert(record.proposal_id, record);
        true
    }

    /// Keep an instruction for manual retry. Returns the attempt count so far.
    pub fn retain(
        &mut self,
        origin: Origin,
        instruction: RelayInstruction,
        error: String,
        current: BlockNumber,
    ) -> u32 {
        let entry = self
            .pending
            .entry(instruction.proposal_id)
            .or_insert_with(|| PendingInstruction {
                origin,
                instruction: instruction.clone(),
                first_seen: current,
                last_error: String::new(),
                attempts: 0,
            });
        entry.origin = origin;
        entry.instruction = instruction;
        entry.last_error = error;
        entry.attempts = entry.attempts.saturating_add(1);
        entry.attempts
    }

    /// Record a non-executable outcome. The first observation is kept.
    pub fn observe(&mut self, outcome: ObservedOutcome) -> bool {
        if self.observed.contains_key(&outcome.proposal_id) {
            return false;
        }
        self.observed.insert(outcome.proposal_id, outcome);
        true
    }
}
