//! The cross-chain relay instruction.

use crate::digest::InstructionDigest;
use crate::error::MessageError;
use bridge_types::{BlockNumber, ChainId, Nonce, Outcome, ProposalId, Tally};
use serde::{Deserialize, Serialize};

/// A finalized outcome travelling from the home side to the remote side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayInstruction {
    /// Chain the instruction was finalized on. Must agree with the
    /// transport's attestation.
    pub source_chain: ChainId,
    pub proposal_id: ProposalId,
    pub outcome: Outcome,
    /// Tally at finalization.
    pub tally: Tally,
    /// Home-side outbound sequence number, unique per home instance.
    pub nonce: Nonce,
    /// Home block at which finalization happened.
    pub finalized_at: BlockNumber,
}

impl RelayInstruction {
    pub fn encode(&self) -> Result<Vec<u8>, MessageError> {
        crate::codec::encode(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, MessageError> {
        crate::codec::decode(bytes)
    }

    /// Correlation identifier over the encoded form.
    pub fn digest(&self) -> Result<InstructionDigest, MessageError> {
        Ok(InstructionDigest::of(&self.encode()?))
    }

    pub fn is_executable(&self) -> bool {
        self.outcome == Outcome::Succeeded
    }
}
