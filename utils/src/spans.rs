//! Span constructors for relay operations.
//!
//! Consistent span names and field sets make it easy to follow one proposal
//! from mirroring on the home chain to execution on the remote chain.

use tracing::{info_span, Span};

/// Finalization of one proposal on the home side.
pub fn finalize_span(proposal: u64) -> Span {
    info_span!("finalize", proposal)
}

/// Delivery of one inbound message to the remote side.
pub fn deliver_span(source_chain: u64, attempt: u32) -> Span {
    info_span!("deliver", source_chain, attempt)
}

/// One pass of the relayer over its queue.
pub fn relay_drain_span(deferred: usize) -> Span {
    info_span!("relay_drain", deferred)
}

/// A scripted end-to-end simulation run.
pub fn simulate_span(scenario: &str) -> Span {
    info_span!("simulate", scenario = %scenario)
}
