//! Remote side of the governance relay.
//!
//! [`RemoteExecutor`] accepts instructions delivered by the message
//! transport, checks that they come from the configured home instance and
//! casts the corresponding vote on the remote governor exactly once. The
//! [`ExecutionLedger`] remembers what has been executed so redelivery,
//! reordering and manual replays are all harmless.

pub mod error;
pub mod event;
pub mod executor;
pub mod governor;
pub mod ledger;

pub use error::ExecutorError;
pub use event::RemoteEvent;
pub use executor::{Delivery, ManualProof, RemoteExecutor, RemoteState};
pub use governor::{GovernorError, RemoteGovernor, RemoteProposal, RemoteReceipt};
pub use ledger::{
    ExecutionLedger, ExecutionRecord, Executor, ObservedOutcome, Origin, PendingInstruction,
};
