//! Transport interface between the two chains.

use crate::error::TransportError;
use bridge_types::{Address, ChainId};
use serde::{Deserialize, Serialize};

/// Send primitive of the cross-chain message transport.
///
/// The transport guarantees at-least-once delivery with a verifiable sender
/// attestation, but no ordering and no deduplication. A successful `send`
/// only means the transport accepted the payload.
pub trait MessageTransport {
    fn send(
        &self,
        destination_chain: ChainId,
        destination: Address,
        payload: Vec<u8>,
    ) -> Result<(), TransportError>;
}

/// A payload as handed to the transport by the sending side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub destination_chain: ChainId,
    pub destination: Address,
    pub payload: Vec<u8>,
}

/// A payload as delivered to the receiving side.
///
/// `source_chain` and `sender` are the transport's attestation of where the
/// payload came from; the receiver trusts them and nothing inside `payload`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub source_chain: ChainId,
    pub sender: Address,
    pub payload: Vec<u8>,
}

impl InboundMessage {
    pub fn new(source_chain: ChainId, sender: Address, payload: Vec<u8>) -> Self {
        Self {
            source_chain,
            sender,
            payload,
        }
    }
}
