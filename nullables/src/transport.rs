//! Nullable transport: records sends and hands them back as deliveries.

use bridge_messages::{InboundMessage, MessageTransport, OutboundMessage, TransportError};
use bridge_types::{Address, ChainId};
use std::sync::Mutex;

/// A transport that never delivers on its own.
///
/// Every accepted send is queued; the test drains the queue with
/// [`NullTransport::take_deliveries`] and decides how to deliver (once,
/// twice, reversed, not at all). Deliveries carry the attestation configured
/// at construction.
pub struct NullTransport {
    source_chain: ChainId,
    sender: Address,
    outbox: Mutex<Vec<OutboundMessage>>,
    sent_total: Mutex<usize>,
    refusal: Mutex<Option<String>>,
}

impl NullTransport {
    pub fn new(source_chain: ChainId, sender: Address) -> Self {
        Self {
            source_chain,
            sender,
            outbox: Mutex::new(Vec::new()),
            sent_total: Mutex::new(0),
            refusal: Mutex::new(None),
        }
    }

    /// Refuse every send with `reason` until [`NullTransport::accept`].
    pub fn refuse(&self, reason: &str) {
        *self.refusal.lock().unwrap() = Some(reason.to_string());
    }

    pub fn accept(&self) {
        *self.refusal.lock().unwrap() = None;
    }

    /// Messages accepted and not yet taken.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.outbox.lock().unwrap().clone()
    }

    /// Number of sends accepted over the transport's lifetime.
    pub fn sent_total(&self) -> usize {
        *self.sent_total.lock().unwrap()
    }

    /// Drain the queue into inbound messages, in send order.
    pub fn take_deliveries(&self) -> Vec<InboundMessage> {
        self.outbox
            .lock()
            .unwrap()
            .drain(..)
            .map(|m| InboundMessage::new(self.source_chain, self.sender, m.payload))
            .collect()
    }
}

impl MessageTransport for NullTransport {
    fn send(
        &self,
        destination_chain: ChainId,
        destination: Address,
        payload: Vec<u8>,
    ) -> Result<(), TransportError> {
        if let Some(reason) = self.refusal.lock().unwrap().clone() {
            return Err(TransportError::Rejected(reason));
        }
        self.outbox.lock().unwrap().push(OutboundMessage {
            destination_chain,
            destination,
            payload,
        });
        *self.sent_total.lock().unwrap() += 1;
        Ok(())
    }
}
