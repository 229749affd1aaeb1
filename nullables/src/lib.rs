//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator of the relay (voting-power oracle, message
//! transport, remote governor, storage, block height) is abstracted behind a
//! trait. This crate provides implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! All of them are `Send + Sync` so they can sit behind the node's relayer.

pub mod chain;
pub mod governor;
pub mod store;
pub mod transport;
pub mod voting_power;

pub use chain::NullChain;
pub use governor::{NullGovernor, RecordedVote};
pub use store::NullStateStore;
pub use transport::NullTransport;
pub use voting_power::NullVotingPower;
