//! Per-instance authority configuration.

use crate::error::AuthorityError;
use crate::event::AdminEvent;
use bridge_types::{Address, ChainId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Basis-point denominator: 10_000 bps = 100%.
pub const BPS_DENOMINATOR: u16 = 10_000;

/// The peer instance on the other chain that this instance trusts.
///
/// On the home side this is where instructions are sent; on the remote side it
/// is the only origin whose instructions are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Counterpart {
    pub chain_id: ChainId,
    pub address: Address,
}

impl Counterpart {
    pub fn new(chain_id: ChainId, address: Address) -> Self {
        Self { chain_id, address }
    }

    pub fn matches(&self, chain_id: ChainId, sender: &Address) -> bool {
        self.chain_id == chain_id && self.address == *sender
    }
}

impl fmt::Display for Counterpart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.address, self.chain_id)
    }
}

/// Owner, trusted counterpart, quorum threshold and pause flag of one instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityConfig {
    owner: Address,
    pending_owner: Option<Address>,
    counterpart: Counterpart,
    quorum_bps: u16,
    paused: bool,
}

impl AuthorityConfig {
    pub fn new(
        owner: Address,
        counterpart: Counterpart,
        quorum_bps: u16,
    ) -> Result<Self, AuthorityError> {
        if owner.is_zero() || counterpart.address.is_zero() {
            return Err(AuthorityError::ZeroAddress);
        }
        validate_quorum(quorum_bps)?;
        Ok(Self {
            owner,
            pending_owner: None,
            counterpart,
            quorum_bps,
            paused: false,
        })
    }

    // ── Views ──────────────────────────────────────────────────────────

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn pending_owner(&self) -> Option<Address> {
        self.pending_owner
    }

    pub fn counterpart(&self) -> Counterpart {
        self.counterpart
    }

    pub fn quorum_bps(&self) -> u16 {
        self.quorum_bps
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_trusted_origin(&self, chain_id: ChainId, sender: &Address) -> bool {
        self.counterpart.matches(chain_id, sender)
    }

    // ── Guards ─────────────────────────────────────────────────────────

    pub fn ensure_owner(&self, caller: &Address) -> Result<(), AuthorityError> {
        if *caller == self.owner {
            Ok(())
        } else {
            Err(AuthorityError::NotAuthorized { caller: *caller })
        }
    }

    pub fn ensure_not_paused(&self) -> Result<(), AuthorityError> {
        if self.paused {
            Err(AuthorityError::Paused)
        } else {
            Ok(())
        }
    }

    // ── Mutations (owner only) ─────────────────────────────────────────

    /// Step one of an ownership transfer. Replaces any earlier pending owner.
    pub fn propose_owner(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<AdminEvent, AuthorityError> {
        self.ensure_owner(caller)?;
        if new_owner.is_zero() {
            return Err(AuthorityError::ZeroAddress);
        }
        self.pending_owner = Some(new_owner);
        tracing::info!(owner = %self.owner, pending = %new_owner, "ownership transfer proposed");
        Ok(AdminEvent::OwnershipTransferStarted {
            owner: self.owner,
            pending: new_owner,
        })
    }

    /// Step two: only the pending owner can complete the transfer.
    pub fn accept_owner(&mut self, caller: &Address) -> Result<AdminEvent, AuthorityError> {
        let pending = self.pending_owner.ok_or(AuthorityError::NoPendingTransfer)?;
        if *caller != pending {
            return Err(AuthorityError::NotAuthorized { caller: *caller });
        }
        let old = self.owner;
        self.owner = pending;
        self.pending_owner = None;
        tracing::info!(%old, new = %pending, "ownership transferred");
        Ok(AdminEvent::OwnershipTransferred { old, new: pending })
    }

    pub fn cancel_transfer(&mut self, caller: &Address) -> Result<AdminEvent, AuthorityError> {
        self.ensure_owner(caller)?;
        let cancelled = self
            .pending_owner
            .take()
            .ok_or(AuthorityError::NoPendingTransfer)?;
        Ok(AdminEvent::OwnershipTransferCancelled {
            owner: self.owner,
            cancelled,
        })
    }

    pub fn set_quorum_bps(
        &mut self,
        caller: &Address,
        quorum_bps: u16,
    ) -> Result<AdminEvent, AuthorityError> {
        self.ensure_owner(caller)?;
        validate_quorum(quorum_bps)?;
        let old = self.quorum_bps;
        self.quorum_bps = quorum_bps;
        tracing::info!(old, new = quorum_bps, "quorum updated");
        Ok(AdminEvent::QuorumUpdated {
            old,
            new: quorum_bps,
        })
    }

    pub fn set_counterpart(
        &mut self,
        caller: &Address,
        counterpart: Counterpart,
    ) -> Result<AdminEvent, AuthorityError> {
        self.ensure_owner(caller)?;
        if counterpart.address.is_zero() {
            return Err(AuthorityError::ZeroAddress);
        }
        let old = self.counterpart;
        self.counterpart = counterpart;
        tracing::info!(%old, new = %counterpart, "counterpart updated");
        Ok(AdminEvent::CounterpartUpdated {
            old,
            new: counterpart,
        })
    }

    pub fn pause(&mut self, caller: &Address) -> Result<AdminEvent, AuthorityError> {
        self.ensure_owner(caller)?;
        if self.paused {
            return Err(AuthorityError::AlreadyPaused);
        }
        self.paused = true;
        tracing::warn!(by = %caller, "instance paused");
        Ok(AdminEvent::PauseChanged {
            old: false,
            new: true,
        })
    }

    pub fn unpause(&mut self, caller: &Address) -> Result<AdminEvent, AuthorityError> {
        self.ensure_owner(caller)?;
        if !self.paused {
            return Err(AuthorityError::NotPaused);
        }
        self.paused = false;
        tracing::info!(by = %caller, "instance unpaused");
        Ok(AdminEvent::PauseChanged {
            old: true,
            new: false,
        })
    }
}

fn validate_quorum(quorum_bps: u16) -> Result<(), AuthorityError> {
    if quorum_bps == 0 || quorum_bps > BPS_DENOMINATOR {
        return Err(AuthorityError::InvalidQuorum(quorum_bps));
    }
    Ok(())
}
