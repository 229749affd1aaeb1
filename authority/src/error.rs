use bridge_types::{Address, ErrorClass};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorityError {
    #[error("{caller} is not authorized for this action")]
    NotAuthorized { caller: Address },

    #[error("quorum must be within [1, 10000] basis points, got {0}")]
    InvalidQuorum(u16),

    #[error("the zero address cannot hold authority")]
    ZeroAddress,

    #[error("no ownership transfer is pending")]
    NoPendingTransfer,

    #[error("instance is paused")]
    Paused,

    #[error("instance is already paused")]
    AlreadyPaused,

    #[error("instance is not paused")]
    NotPaused,
}

impl AuthorityError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NotAuthorized { .. } => ErrorClass::Authorization,
            Self::Paused => ErrorClass::Resource,
            Self::InvalidQuorum(_)
            | Self::ZeroAddress
            | Self::NoPendingTransfer
            | Self::AlreadyPaused
            | Self::NotPaused => ErrorClass::Precondition,
        }
    }
}
