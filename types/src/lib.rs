//! Fundamental types for the mirror bridge.
//!
//! This crate defines the primitives shared by the home side (mirrored voting)
//! and the remote side (execution): addresses, proposal and block identifiers,
//! vote choices, tallies, outcomes, error classes and the event bus.

pub mod address;
pub mod error;
pub mod event;
pub mod ids;
pub mod vote;

pub use address::Address;
pub use error::{AddressError, ErrorClass};
pub use event::EventBus;
pub use ids::{BlockNumber, ChainId, Nonce, ProposalId};
pub use vote::{Outcome, Support, Tally};
