use crate::governor::GovernorError;
use bridge_authority::AuthorityError;
use bridge_messages::MessageError;
use bridge_types::{Address, ChainId, ErrorClass, Nonce, Outcome, ProposalId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error(transparent)]
    Authority(#[from] AuthorityError),

    #[error("untrusted origin {sender} on chain {chain}")]
    UntrustedOrigin { chain: ChainId, sender: Address },

    #[error("malformed instruction: {0}")]
    Malformed(#[from] MessageError),

    #[error("proposal {proposal} did not succeed ({outcome})")]
    NotSucceeded { proposal: ProposalId, outcome: Outcome },

    #[error("nonce {nonce} was already consumed by proposal {consumed_by}")]
    StaleNonce { nonce: Nonce, consumed_by: ProposalId },

    #[error("remote vote on proposal {proposal} failed: {source}")]
    RemoteCall {
        proposal: ProposalId,
        #[source]
        source: GovernorError,
    },

    #[error("no retained instruction for proposal {0}")]
    NoPendingInstruction(ProposalId),

    #[error("proof is for proposal {found}, expected {expected}")]
    ProofMismatch {
        expected: ProposalId,
        found: ProposalId,
    },
}

impl ExecutorError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Authority(e) => e.class(),
            Self::UntrustedOrigin { .. } | Self::StaleNonce { .. } | Self::ProofMismatch { .. } => {
                ErrorClass::Authorization
            }
            Self::Malformed(_) | Self::NotSucceeded { .. } | Self::NoPendingInstruction(_) => {
                ErrorClass::Precondition
            }
            Self::RemoteCall { .. } => ErrorClass::Execution,
        }
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Authority(AuthorityError::Paused))
    }
}
