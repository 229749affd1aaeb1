//! Administrative control surface shared by both relay state machines.
//!
//! Each state machine owns one [`AuthorityConfig`]. Every mutation is
//! restricted to the current owner, returns the [`AdminEvent`] describing the
//! old and new value, and leaves publication of that event to the caller.
//!
//! Ownership moves in two steps (propose, then accept by the new owner) so a
//! mistyped address can never strand the instance without an owner.

pub mod config;
pub mod error;
pub mod event;

pub use config::{AuthorityConfig, Counterpart, BPS_DENOMINATOR};
pub use error::AuthorityError;
pub use event::AdminEvent;
