//! Error types shared across crates.

use thiserror::Error;

/// Why an address string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address {0:?} must start with 0x")]
    MissingPrefix(String),

    #[error("address must have {expected} hex digits, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("invalid hex in address: {0}")]
    InvalidHex(String),
}

/// Coarse classification of every failure a bridge operation can report.
///
/// Callers use the class, not the individual variant, to decide what to do
/// next: resubmit with other credentials, treat as a no-op signal, wait for a
/// precondition to change, or retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Wrong caller or wrong message origin. Never retried automatically.
    Authorization,
    /// Expected in normal operation (duplicate mirror, closed window, ...).
    Precondition,
    /// Resolvable only once the precondition changes (voting power, pause).
    Resource,
    /// Remote call or transport failure. Retryable via manual execution.
    Execution,
}

impl ErrorClass {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Execution)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authorization => "authorization",
            Self::Precondition => "precondition",
            Self::Resource => "resource",
            Self::Execution => "execution",
        }
    }
}
