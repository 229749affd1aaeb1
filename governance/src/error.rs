use crate::oracle::OracleError;
use bridge_authority::AuthorityError;
use bridge_messages::{MessageError, TransportError};
use bridge_types::{Address, BlockNumber, ErrorClass, ProposalId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error(transparent)]
    Authority(#[from] AuthorityError),

    #[error("proposal {0} is already mirrored")]
    AlreadyMirrored(ProposalId),

    #[error("invalid voting window [{start}, {end}] at {current}")]
    InvalidWindow {
        start: BlockNumber,
        end: BlockNumber,
        current: BlockNumber,
    },

    #[error("proposal {0} has not been mirrored")]
    UnknownProposal(ProposalId),

    #[error("voting on proposal {proposal} is closed at {current}")]
    VotingClosed {
        proposal: ProposalId,
        current: BlockNumber,
    },

    #[error("voting on proposal {proposal} is active until {end} (now {current})")]
    VotingStillActive {
        proposal: ProposalId,
        end: BlockNumber,
        current: BlockNumber,
    },

    #[error("proposal {0} is already finalized")]
    AlreadyFinalized(ProposalId),

    #[error("{voter} has already voted on proposal {proposal}")]
    AlreadyVoted { proposal: ProposalId, voter: Address },

    #[error("{voter} has no voting power at {block}")]
    NoVotingPower { voter: Address, block: BlockNumber },

    #[error("tally for proposal {0} would overflow")]
    TallyOverflow(ProposalId),

    #[error("outbound nonce space exhausted")]
    NonceExhausted,

    #[error("voting power oracle: {0}")]
    Oracle(#[from] OracleError),

    #[error("instruction encoding: {0}")]
    Message(#[from] MessageError),

    #[error("message transport: {0}")]
    Transport(#[from] TransportError),
}

impl GovernanceError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Authority(e) => e.class(),
            Self::AlreadyMirrored(_)
            | Self::InvalidWindow { .. }
            | Self::UnknownProposal(_)
            | Self::VotingClosed { .. }
            | Self::VotingStillActive { .. }
            | Self::AlreadyFinalized(_)
            | Self::AlreadyVoted { .. }
            | Self::TallyOverflow(_)
            | Self::Message(_) => ErrorClass::Precondition,
            Self::NoVotingPower { .. } | Self::NonceExhausted | Self::Oracle(_) => {
                ErrorClass::Resource
            }
            Self::Transport(_) => ErrorClass::Execution,
        }
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Authority(AuthorityError::Paused))
    }
}
