//! Cross-chain message types for the mirror bridge.
//!
//! The home side finalizes a proposal into a [`RelayInstruction`], encodes it
//! with [`codec::encode`] and hands the bytes to a [`MessageTransport`]. The
//! transport attaches its own attestation (source chain and sender) and
//! eventually delivers an [`InboundMessage`] to the remote side, possibly more
//! than once and in any order.

pub mod codec;
pub mod digest;
pub mod error;
pub mod instruction;
pub mod transport;

pub use codec::{decode, encode, MAX_INSTRUCTION_SIZE, WIRE_VERSION};
pub use digest::InstructionDigest;
pub use error::{MessageError, TransportError};
pub use instruction::RelayInstruction;
pub use transport::{InboundMessage, MessageTransport, OutboundMessage};
