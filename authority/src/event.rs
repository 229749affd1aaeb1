//! Administrative change notifications.

use crate::config::Counterpart;
use bridge_types::Address;
use serde::{Deserialize, Serialize};

/// One administrative change, carrying the value before and after.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminEvent {
    OwnershipTransferStarted {
        owner: Address,
        pending: Address,
    },
    OwnershipTransferCancelled {
        owner: Address,
        cancelled: Address,
    },
    OwnershipTransferred {
        old: Address,
        new: Address,
    },
    QuorumUpdated {
        old: u16,
        new: u16,
    },
    CounterpartUpdated {
        old: Counterpart,
        new: Counterpart,
    },
    /// The remote governance system the executor votes on was re-pointed.
    GovernorUpdated {
        old: Address,
        new: Address,
    },
    PauseChanged {
        old: bool,
        new: bool,
    },
}

impl AdminEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::OwnershipTransferStarted { .. } => "ownership_transfer_started",
            Self::OwnershipTransferCancelled { .. } => "ownership_transfer_cancelled",
            Self::OwnershipTransferred { .. } => "ownership_transferred",
            Self::QuorumUpdated { .. } => "quorum_updated",
            Self::CounterpartUpdated { .. } => "counterpart_updated",
            Self::GovernorUpdated { .. } => "governor_updated",
            Self::PauseChanged { .. } => "pause_changed",
        }
    }
}
