//! Blake2b-256 digest of encoded instructions, used to correlate log lines
//! across the two chains.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

type Blake2b256 = Blake2b<U32>;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstructionDigest([u8; 32]);

impl InstructionDigest {
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update(bytes);
        let mut output = [0u8; 32];
        output.copy_from_slice(&hasher.finalize());
        Self(output)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First eight hex digits, enough for log correlation.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Debug for InstructionDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstructionDigest({})", self.short())
    }
}

impl fmt::Display for InstructionDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        assert_eq!(InstructionDigest::of(b"relay"), InstructionDigest::of(b"relay"));
    }

    #[test]
    fn different_input_different_digest() {
        assert_ne!(InstructionDigest::of(b"relay-1"), InstructionDigest::of(b"relay-2"));
    }

    #[test]
    fn display_is_full_hex() {
        let digest = InstructionDigest::of(b"x");
        assert_eq!(digest.to_string().len(), 64);
        assert!(digest.to_string().starts_with(&digest.short()));
    }
}
