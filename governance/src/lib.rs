//! Home side of the governance relay.
//!
//! A proposal created on the remote chain is mirrored here with a voting
//! window expressed in home-chain blocks. Token holders vote with their
//! weight at the window's start block. Once the window closes anyone may
//! finalize: the quorum policy decides the outcome and exactly one
//! [`bridge_messages::RelayInstruction`] is sent to the configured
//! counterpart.

pub mod error;
pub mod event;
pub mod mirror;
pub mod oracle;
pub mod proposal;
pub mod quorum;
pub mod table;

pub use error::GovernanceError;
pub use event::HomeEvent;
pub use mirror::{HomeState, MirrorGovernor, DEFAULT_MIRROR_TOLERANCE};
pub use oracle::{OracleError, VotingPowerOracle};
pub use proposal::{MirroredProposal, ProposalState, VoteReceipt};
pub use quorum::{evaluate, quorum_threshold};
pub use table::ProposalTable;
