//! Wire codec: a one-byte version prefix followed by the bincode body.

use crate::error::MessageError;
use crate::instruction::RelayInstruction;

/// Current wire format version.
pub const WIRE_VERSION: u8 = 1;

/// Largest payload either side will encode or attempt to decode.
pub const MAX_INSTRUCTION_SIZE: usize = 4 * 1024;

/// Encode an instruction for the transport.
pub fn encode(instruction: &RelayInstruction) -> Result<Vec<u8>, MessageError> {
    let body =
        bincode::serialize(instruction).map_err(|e| MessageError::Malformed(e.to_string()))?;
    let size = body.len() + 1;
    if size > MAX_INSTRUCTION_SIZE {
        return Err(MessageError::MessageTooLarge {
            size,
            max: MAX_INSTRUCTION_SIZE,
        });
    }
    let mut out = Vec::with_capacity(size);
    out.push(WIRE_VERSION);
    out.extend_from_slice(&body);
    Ok(out)
}

/// Decode an instruction received from the transport.
pub fn decode(bytes: &[u8]) -> Result<RelayInstruction, MessageError> {
    if bytes.len() > MAX_INSTRUCTION_SIZE {
        return Err(MessageError::MessageTooLarge {
            size: bytes.len(),
            max: MAX_INSTRUCTION_SIZE,
        });
    }
    let (version, body) = bytes.split_first().ok_or(MessageError::Empty)?;
    if *version != WIRE_VERSION {
        return Err(MessageError::UnsupportedVersion(*version));
    }
    bincode::deserialize(body).map_err(|e| MessageError::Malformed(e.to_string()))
}
