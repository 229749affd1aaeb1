use crate::ledger::Executor;
use bridge_authority::AdminEvent;
use bridge_messages::InstructionDigest;
use bridge_types::{Nonce, ProposalId};

/// Remote-side notifications. Duplicate deliveries and failed calls emit
/// nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteEvent {
    InstructionExecuted {
        proposal: ProposalId,
        nonce: Nonce,
        executor: Executor,
        digest: InstructionDigest,
    },
    Admin(AdminEvent),
}

impl RemoteEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InstructionExecuted { .. } => "instruction_executed",
            Self::Admin(admin) => admin.name(),
        }
    }
}
